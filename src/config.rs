// region:    --- Imports
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

// endregion: --- Imports

/// 타이머 리셋 기본 시간(초)
pub const DEFAULT_RESET_SECONDS: u32 = 15;

/// 세션 송신 큐 기본 크기
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

// region:    --- Config
/// 서비스 설정 (환경 변수)
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub room: RoomConfig,
}

/// 룸 코디네이터 설정
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// resetTimer 시 재시작되는 카운트다운 시간(초)
    pub reset_duration_secs: u32,
    /// 타이머 틱 간격
    pub tick_period: Duration,
    /// 세션별 송신 큐 크기 (가득 차면 이벤트를 버린다)
    pub outbox_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            reset_duration_secs: DEFAULT_RESET_SECONDS,
            tick_period: Duration::from_secs(1),
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
        }
    }
}

impl Config {
    /// 환경 변수로부터 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 생성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "BIND_ADDR", "0.0.0.0:3000".parse().ok())?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", Some(5))?;
        let reset_duration_secs =
            parse_or(&lookup, "TIMER_RESET_SECONDS", Some(DEFAULT_RESET_SECONDS))?;
        if reset_duration_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "TIMER_RESET_SECONDS",
                value: "0".to_string(),
            });
        }
        let outbox_capacity = parse_or(
            &lookup,
            "SESSION_OUTBOX_CAPACITY",
            Some(DEFAULT_OUTBOX_CAPACITY),
        )?;
        if outbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_OUTBOX_CAPACITY",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            jwt_secret,
            database_url,
            database_max_connections,
            room: RoomConfig {
                reset_duration_secs,
                outbox_capacity,
                ..RoomConfig::default()
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => default.ok_or(ConfigError::Missing(key)),
    }
}

// endregion: --- Config
