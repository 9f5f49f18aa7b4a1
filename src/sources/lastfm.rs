use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use scraper::{Html, Selector};

use crate::models::TopTag;
use crate::sources::{FetchError, TagSource};

/// Last.fm 1.0 API의 아티스트 toptags 엔드포인트. 인증이 필요 없다.
const TOPTAGS_BASE: &str = "https://ws.audioscrobbler.com/1.0/artist";

/// 요청 타임아웃. 이 시간을 넘기면 FetchError::Timeout으로 처리된다.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Last.fm toptags 클라이언트.
/// 아티스트별 태그 순위 XML 문서를 받아 (이름, count) 목록으로 파싱한다.
pub struct LastfmClient {
    client: reqwest::blocking::Client,
}

impl LastfmClient {
    /// 새 LastfmClient를 생성한다. User-Agent와 요청 타임아웃을 설정한다.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("grouptag/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Last.fm HTTP 클라이언트 생성에 실패했습니다")?;

        Ok(Self { client })
    }
}

impl TagSource for LastfmClient {
    fn name(&self) -> &str {
        "Last.fm"
    }

    fn top_tags(&self, artist: &str) -> Result<Vec<TopTag>, FetchError> {
        let url = format!("{}/{}/toptags.xml", TOPTAGS_BASE, encode_path(artist));

        let body = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .text()?;

        parse_toptags(&body)
    }
}

/// toptags 문서에서 `<tag>`의 name/count를 문서 순서 그대로 추출한다.
/// count가 정수로 파싱되지 않으면 문서 전체를 손상된 응답으로 본다.
fn parse_toptags(body: &str) -> Result<Vec<TopTag>, FetchError> {
    let document = Html::parse_document(body);

    let tag_sel = Selector::parse("toptags > tag").unwrap();
    let name_sel = Selector::parse("name").unwrap();
    let count_sel = Selector::parse("count").unwrap();

    let mut tags = Vec::new();

    for element in document.select(&tag_sel) {
        let name = match element.select(&name_sel).next() {
            Some(el) => el.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        if name.is_empty() {
            continue;
        }

        let count_text = element
            .select(&count_sel)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();

        let count: u32 = count_text.trim().parse().map_err(|_| {
            FetchError::Other(anyhow!(
                "태그 count를 파싱할 수 없습니다: {:?}",
                count_text.trim()
            ))
        })?;

        tags.push(TopTag { name, count });
    }

    Ok(tags)
}

/// 아티스트 이름을 URL 경로 세그먼트로 퍼센트 인코딩한다.
fn encode_path(s: &str) -> String {
    let mut result = String::new();
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push('%');
                result.push_str(&format!("{:02X}", byte));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<toptags artist="Slowdive">
  <tag>
    <name>shoegaze</name>
    <count>100</count>
    <url>www.last.fm/tag/shoegaze</url>
  </tag>
  <tag>
    <name> dream pop </name>
    <count> 62 </count>
    <url>www.last.fm/tag/dream%20pop</url>
  </tag>
  <tag>
    <name>indie</name>
    <count>7</count>
    <url>www.last.fm/tag/indie</url>
  </tag>
</toptags>"#;

    #[test]
    fn test_parse_keeps_document_order() {
        let tags = parse_toptags(SAMPLE).unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].name, "shoegaze");
        assert_eq!(tags[0].count, 100);
        assert_eq!(tags[1].name, "dream pop");
        assert_eq!(tags[2].name, "indie");
        assert_eq!(tags[2].count, 7);
    }

    #[test]
    fn test_parse_trims_name_and_count() {
        let tags = parse_toptags(SAMPLE).unwrap();
        // 공백으로 둘러싸인 name/count도 정상 파싱
        assert_eq!(tags[1].name, "dream pop");
        assert_eq!(tags[1].count, 62);
    }

    #[test]
    fn test_parse_empty_ranking() {
        let body = r#"<toptags artist="Nobody"></toptags>"#;
        let tags = parse_toptags(body).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_parse_bad_count_is_error() {
        let body = r#"<toptags artist="X">
  <tag><name>rock</name><count>many</count></tag>
</toptags>"#;
        let err = parse_toptags(body).unwrap_err();
        assert!(matches!(err, FetchError::Other(_)));
    }

    #[test]
    fn test_parse_skips_tag_without_name() {
        let body = r#"<toptags artist="X">
  <tag><count>10</count></tag>
  <tag><name>rock</name><count>10</count></tag>
</toptags>"#;
        let tags = parse_toptags(body).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "rock");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("Slowdive"), "Slowdive");
        assert_eq!(encode_path("The Cure"), "The%20Cure");
        assert_eq!(encode_path("AC/DC"), "AC%2FDC");
        assert_eq!(encode_path("아이유"), "%EC%95%84%EC%9D%B4%EC%9C%A0");
    }

    /// 실제 Last.fm 엔드포인트에서 태그 순위를 가져오는 통합 테스트.
    /// 네트워크 접근이 필요하므로 기본 테스트에서는 제외한다.
    /// 실행: cargo test lastfm -- --ignored
    #[test]
    #[ignore]
    fn test_fetch_toptags_from_lastfm() {
        let client = LastfmClient::new().expect("LastfmClient 생성 실패");

        let tags = client.top_tags("Radiohead").expect("top_tags 실패");

        assert!(!tags.is_empty(), "태그가 하나도 없음");
        println!("태그 {}개 수신", tags.len());
        for tag in tags.iter().take(5) {
            println!("{} ({})", tag.name, tag.count);
        }
    }
}
