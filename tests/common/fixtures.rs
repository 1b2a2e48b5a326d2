//! Canned test data.

use std::path::Path;

use algo_sandbox_core::HarnessConfig;

/// Global delta of an auction app after a bid, as the node reports it.
pub const AUCTION_DELTA_JSON: &str = r#"[
    {"key": "YXVjdGlvbkVuZA==", "value": {"action": 2, "uint": 1654814877}},
    {"key": "aGlnaGVzdEJpZGRlcg==", "value": {"action": 1, "bytes": "CKqsSJHzw81yK363IJzKm/DuK95cWwGBeEcxmVLlGgg="}},
    {"key": "aGlnaGVzdEJpZA==", "value": {"action": 2, "uint": 222222}},
    {"key": "b3duZXI=", "value": {"action": 1, "bytes": "5ZKg7tCjd7z9TuDSKQPXSmbZWeksjzlgU7SRpzLCiUI="}}
]"#;

pub const OWNER_ADDRESS: &str = "4WJKB3WQUN33Z7KO4DJCSA6XJJTNSWPJFSHTSYCTWSI2OMWCRFBOCBYLIY";
pub const HIGHEST_BIDDER_ADDRESS: &str =
    "BCVKYSER6PB424RLP23SBHGKTPYO4K66LRNQDALYI4YZSUXFDIEBTBV7GM";

pub fn auction_delta() -> Vec<algo_sandbox_types::StateDeltaEntry> {
    serde_json::from_str(AUCTION_DELTA_JSON).expect("auction delta fixture")
}

pub const APPROVAL_SOURCE: &str = "#pragma version 6\nint 1\nreturn\n";
pub const CLEAR_SOURCE: &str = "#pragma version 6\nint 1\nreturn\n";

/// Write approval/clear sources into `dir` and return (approval, clear) paths.
pub fn write_programs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let approval = dir.join("approval.teal");
    let clear = dir.join("clear.teal");
    std::fs::write(&approval, APPROVAL_SOURCE).expect("write approval");
    std::fs::write(&clear, CLEAR_SOURCE).expect("write clear");
    (approval, clear)
}

/// Config pointing all file paths into `dir`.
pub fn harness_config(dir: &Path) -> HarnessConfig {
    let (approval, clear) = write_programs(dir);
    let mut config = HarnessConfig::default()
        .with_dryrun_dir(dir.join("dryruns"))
        .with_programs(approval, clear);
    config.app_schema.global_ints = 1;
    config.app_schema.global_bytes = 1;
    config
}
