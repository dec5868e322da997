//! 설정 파일 저장소 (TOML / JSON)

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// 설정 디렉토리 하나를 가리키는 저장소
#[derive(Debug, Clone)]
pub struct ConfigStore {
    base_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 글로벌 설정 (<config_dir>/eventer/)
    pub fn global() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join("eventer");
        Ok(Self::new(dir))
    }

    /// 프로젝트 설정 (.eventer/)
    pub fn project(root: impl Into<PathBuf>) -> Self {
        Self::new(root.into().join(".eventer"))
    }

    /// 현재 디렉토리 프로젝트 설정
    pub fn current_project() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::Config(format!("Cannot get current directory: {}", e)))?;
        Ok(Self::project(cwd))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    /// 파일 로드 (확장자로 형식 결정)
    pub fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<T> {
        read_file(&self.file_path(filename))
    }

    /// 파일이 없으면 None
    pub fn load_optional<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.file_path(filename);
        if !path.exists() {
            return Ok(None);
        }
        read_file(&path).map(Some)
    }

    /// 파일 저장 (확장자로 형식 결정)
    pub fn save<T: Serialize>(&self, filename: &str, data: &T) -> Result<()> {
        if !self.base_dir.exists() {
            std::fs::create_dir_all(&self.base_dir)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        let path = self.file_path(filename);
        let content = match Format::of(&path)? {
            Format::Toml => toml::to_string_pretty(data)
                .map_err(|e| Error::Config(format!("Failed to serialize {}: {}", path.display(), e)))?,
            Format::Json => serde_json::to_string_pretty(data)?,
        };
        std::fs::write(&path, content)?;
        Ok(())
    }
}

/// 경로 하나를 읽어 역직렬화
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    match Format::of(path)? {
        Format::Toml => Ok(toml::from_str(&content)?),
        Format::Json => Ok(serde_json::from_str(&content)?),
    }
}

enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("json") => Ok(Format::Json),
            _ => Err(Error::Config(format!(
                "Unsupported config format: {}",
                path.display()
            ))),
        }
    }
}
