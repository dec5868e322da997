//! Config - 엔진 설정과 설정 파일 저장소

mod eventer;
mod store;

pub use eventer::{ConfigLayer, EventerConfig, EVENTER_CONFIG_FILE};
pub use store::{read_file, ConfigStore};
