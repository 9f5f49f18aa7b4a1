pub mod lastfm;

use std::error::Error;
use std::fmt;

use crate::models::TopTag;

/// 태그 순위 소스 트레이트.
/// Last.fm 외의 태그 집계 서비스도 이 트레이트로 추상화한다.
pub trait TagSource {
    /// 소스 이름 (로그 출력용).
    fn name(&self) -> &str;
    /// 아티스트의 태그 순위를 문서 순서 그대로 가져온다.
    fn top_tags(&self, artist: &str) -> Result<Vec<TopTag>, FetchError>;
}

/// 원격 조회 실패. Timeout만 동일 요청 재시도 대상이다.
#[derive(Debug)]
pub enum FetchError {
    /// 연결 또는 응답 타임아웃.
    Timeout,
    /// 그 외 모든 실패 (HTTP 오류, 응답 파싱 실패 등).
    /// 이번 실행에서는 해당 아티스트를 태그 없음으로 처리한다.
    Other(anyhow::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "요청이 시간 초과되었습니다"),
            FetchError::Other(e) => write!(f, "{:#}", e),
        }
    }
}

impl Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Other(e.into())
        }
    }
}
