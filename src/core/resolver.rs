use std::collections::HashMap;

use log::{debug, info, warn};

use crate::models::TopTag;
use crate::sources::{FetchError, TagSource};

/// Maximum lookup attempts per artist when the request times out.
const MAX_ATTEMPTS: u32 = 3;

/// Resolves an artist name to a genre string and memoizes the result
/// for the lifetime of the resolver (one run).
///
/// The genre string is built from the remote tag ranking: only the first
/// `max_tags` entries by position are considered, and of those, only tags
/// whose count strictly exceeds `min_count` are included.
pub struct GenreResolver<S: TagSource> {
    source: S,
    cache: HashMap<String, String>,
    min_count: u32,
    max_tags: usize,
}

impl<S: TagSource> GenreResolver<S> {
    pub fn new(source: S, min_count: u32, max_tags: usize) -> Self {
        Self {
            source,
            cache: HashMap::new(),
            min_count,
            max_tags,
        }
    }

    /// Resolve the genre string for an artist. An empty string means
    /// "no usable tags".
    ///
    /// Each name hits the remote service at most once per run; later calls
    /// are answered from the cache. Remote failures degrade to an empty
    /// genre for this run instead of aborting the batch.
    pub fn resolve(&mut self, artist: &str) -> String {
        // Unset-artist sentinel (e.g. a track with no artist tag):
        // never queried, never cached.
        if artist.is_empty() {
            return String::new();
        }

        if let Some(genre) = self.cache.get(artist) {
            debug!("캐시 적중: \"{}\"", artist);
            return genre.clone();
        }

        info!("{}에서 조회 중: \"{}\"", self.source.name(), artist);
        let tags = self.fetch_with_retry(artist);
        let genre = join_tags(&tags, self.min_count, self.max_tags);

        // "태그 없음"(빈 문자열)도 캐시하여 재조회를 막는다
        self.cache.insert(artist.to_string(), genre.clone());
        genre
    }

    /// Repeat the identical lookup on timeout, up to MAX_ATTEMPTS in total.
    /// Exhaustion and permanent failures both degrade to an empty list.
    fn fetch_with_retry(&self, artist: &str) -> Vec<TopTag> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.source.top_tags(artist) {
                Ok(tags) => return tags,
                Err(FetchError::Timeout) if attempt < MAX_ATTEMPTS => {
                    warn!(
                        "요청 시간 초과, 다시 시도합니다 ({}/{})",
                        attempt, MAX_ATTEMPTS
                    );
                }
                Err(e) => {
                    warn!("\"{}\" 태그 조회 실패: {}", artist, e);
                    return Vec::new();
                }
            }
        }
    }
}

/// Concatenate the names of qualifying tags, each followed by a single
/// space. The position cap is applied before the count filter: a tag past
/// position `max_tags` is never considered, whatever its count.
fn join_tags(tags: &[TopTag], min_count: u32, max_tags: usize) -> String {
    let mut genre = String::new();
    for tag in tags.iter().take(max_tags) {
        if tag.count > min_count {
            genre.push_str(tag.name.trim());
            genre.push(' ');
        }
    }
    genre
}
