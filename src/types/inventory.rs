//! Per-region describe/list results consumed by the regional checks

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ec2Instance {
    pub instance_id: String,
    #[serde(default)]
    pub instance_type: Option<String>,
    /// EC2 state name (`running`, `stopped`, ...)
    pub state: String,
    #[serde(default)]
    pub attached_volume_gb: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EbsVolume {
    pub volume_id: String,
    pub size_gb: u64,
    #[serde(default = "default_volume_type")]
    pub volume_type: String,
    /// `available` means attached to nothing
    pub state: String,
}

fn default_volume_type() -> String {
    "gp2".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbInstance {
    pub identifier: String,
    #[serde(default)]
    pub instance_class: Option<String>,
    #[serde(default)]
    pub multi_az: bool,
    #[serde(default)]
    pub monthly_cost: Option<f64>,
}

/// Everything the regional checks read for one region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionInventory {
    #[serde(default)]
    pub instances: Vec<Ec2Instance>,
    #[serde(default)]
    pub volumes: Vec<EbsVolume>,
    #[serde(default)]
    pub db_instances: Vec<DbInstance>,
    #[serde(default)]
    pub lambda_functions: usize,
    #[serde(default)]
    pub s3_buckets: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_defaults() {
        let inv: RegionInventory =
            serde_json::from_str(r#"{"volumes":[{"volume_id":"vol-1","size_gb":10,"state":"available"}]}"#)
                .unwrap();
        assert!(inv.instances.is_empty());
        assert_eq!(inv.volumes[0].volume_type, "gp2");
        assert_eq!(inv.s3_buckets, 0);
    }
}
