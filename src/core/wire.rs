use crate::core::resource::{Range, Resource};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Well-known resource names in the cluster manager's offer/task protocol.
pub const CPUS: &str = "cpus";
pub const MEM: &str = "mem";
pub const DISK: &str = "disk";
pub const GPUS: &str = "gpus";
pub const PORTS: &str = "ports";

/// One typed entry of the wire-format resource list used by offers and task
/// descriptions: a named scalar, or a named list of closed integer ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireResource {
    #[serde(rename = "SCALAR")]
    Scalar { name: String, value: f64 },
    #[serde(rename = "RANGES")]
    Ranges {
        name: String,
        ranges: Vec<(u64, u64)>,
    },
}

impl WireResource {
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self::Scalar {
            name: name.into(),
            value,
        }
    }

    pub fn ranges(name: impl Into<String>, ranges: impl IntoIterator<Item = (u64, u64)>) -> Self {
        Self::Ranges {
            name: name.into(),
            ranges: ranges.into_iter().collect(),
        }
    }
}

/// Build the wire entries describing a task's scalar grant.
pub fn construct(cpu: f64, mem_mb: u64) -> Vec<WireResource> {
    vec![
        WireResource::scalar(CPUS, cpu),
        WireResource::scalar(MEM, mem_mb as f64),
    ]
}

/// Aggregate a wire-format resource list into a [`Resource`].
///
/// Same-named scalars are summed; `ports` range entries are collected into
/// the port set. A well-formed offer never advertises overlapping port
/// ranges, so overlap fails fast as a malformed offer rather than being
/// silently merged. Unrecognised names are skipped.
pub fn decode(entries: &[WireResource]) -> Result<Resource> {
    let mut cpu = 0.0_f64;
    let mut mem_mb = 0.0_f64;
    let mut disk_mb = 0.0_f64;
    let mut gpus = 0.0_f64;
    let mut ports: Vec<Range> = Vec::new();

    for entry in entries {
        match entry {
            WireResource::Scalar { name, value } => match name.as_str() {
                CPUS => cpu += value,
                MEM => mem_mb += value,
                DISK => disk_mb += value,
                GPUS => gpus += value,
                other => {
                    tracing::debug!(name = other, value, "ignoring unknown scalar resource");
                }
            },
            WireResource::Ranges { name, ranges } if name == PORTS => {
                for &(begin, end) in ranges {
                    ports.push(Range::new(begin, end)?);
                }
            }
            WireResource::Ranges { name, .. } => {
                tracing::debug!(name, "ignoring unknown ranges resource");
            }
        }
    }

    Resource::new(cpu, mem_mb as u64, disk_mb as u64, gpus as u32, ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_decode_scalar_offer() {
        let res = decode(&[
            WireResource::scalar(CPUS, 3.0),
            WireResource::scalar(MEM, 256.0),
        ])
        .unwrap();
        assert_eq!(res.cpu(), 3.0);
        assert_eq!(res.mem_mb(), 256);
        assert_eq!(res.disk_mb(), 0);
        assert_eq!(res.port_amount(), 0);
    }

    #[test]
    fn test_decode_construct_round_trip() {
        let res = decode(&construct(2.5, 1024)).unwrap();
        assert_eq!(res.cpu(), 2.5);
        assert_eq!(res.mem_mb(), 1024);
    }

    #[test]
    fn test_decode_sums_same_named_scalars() {
        let res = decode(&[
            WireResource::scalar(CPUS, 1.5),
            WireResource::scalar(CPUS, 0.5),
            WireResource::scalar(MEM, 100.0),
            WireResource::scalar(MEM, 28.0),
            WireResource::scalar(DISK, 512.0),
        ])
        .unwrap();
        assert_eq!(res.cpu(), 2.0);
        assert_eq!(res.mem_mb(), 128);
        assert_eq!(res.disk_mb(), 512);
    }

    #[test]
    fn test_decode_collects_port_ranges() {
        let res = decode(&[
            WireResource::scalar(CPUS, 1.0),
            WireResource::ranges(PORTS, [(31000, 31009)]),
            WireResource::ranges(PORTS, [(32000, 32004)]),
        ])
        .unwrap();
        assert_eq!(res.port_amount(), 15);
        assert_eq!(res.ports().len(), 2);
    }

    #[test]
    fn test_decode_rejects_overlapping_port_entries() {
        let err = decode(&[
            WireResource::ranges(PORTS, [(31000, 31500)]),
            WireResource::ranges(PORTS, [(31400, 32000)]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::OverlappingRanges(..)));
    }

    #[test]
    fn test_decode_rejects_inverted_range() {
        let err = decode(&[WireResource::ranges(PORTS, [(31009, 31000)])]).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn test_decode_skips_unknown_names() {
        let res = decode(&[
            WireResource::scalar(CPUS, 1.0),
            WireResource::scalar("network_bandwidth", 10_000.0),
            WireResource::ranges("vlan_ids", [(100, 200)]),
        ])
        .unwrap();
        assert_eq!(res.cpu(), 1.0);
        assert_eq!(res.port_amount(), 0);
    }

    #[test]
    fn test_wire_json_shape() {
        let json = serde_json::to_value(construct(1.0, 32)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "type": "SCALAR", "name": "cpus", "value": 1.0 },
                { "type": "SCALAR", "name": "mem", "value": 32.0 },
            ])
        );

        let offer: Vec<WireResource> = serde_json::from_value(serde_json::json!([
            { "type": "SCALAR", "name": "cpus", "value": 4.0 },
            { "type": "RANGES", "name": "ports", "ranges": [[31000, 32000]] },
        ]))
        .unwrap();
        assert_eq!(offer[1], WireResource::ranges(PORTS, [(31000, 32000)]));
    }
}
