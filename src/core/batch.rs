use anyhow::Result;

use crate::core::resolver::GenreResolver;
use crate::models::Artist;
use crate::sources::TagSource;

/// 확인 프롬프트에 대한 사용자 응답.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
    Quit,
}

/// 한 번의 실행에서 누적되는 카운터.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// 확인 프롬프트가 표시된 횟수.
    pub prompted: u32,
    /// 실제로 그룹 필드가 기록된 트랙 수.
    pub written: u32,
    /// 쓸 만한 태그가 없어 건너뛴 아티스트 수.
    pub skipped: u32,
    /// 이미 같은 그룹 문자열을 갖고 있어 건드리지 않은 트랙 수.
    pub identical: u32,
}

/// 배치 처리 대상 트랙. 아티스트를 읽고 그룹 필드를 기록한다.
pub trait Track {
    fn artist(&self) -> &str;
    fn grouping(&self) -> Option<&str>;
    fn set_grouping(&mut self, genre: &str) -> Result<()>;
}

/// 사용자 상호작용 시트. CLI에서는 dialoguer 프롬프트로 구현된다.
pub trait Interact {
    /// 태그가 없어 건너뛰는 아티스트를 알린다.
    fn notify_no_tags(&mut self, artist: &str);
    /// 해석된 장르를 보여주고 y/n/q 응답을 받는다.
    fn confirm(&mut self, artist: &str, genre: &str) -> Result<Decision>;
}

/// 트랙 목록을 순서대로 걸어가며 아티스트 경계마다 장르를 해석하고,
/// 사용자 확인에 따라 그룹 필드를 기록한다.
///
/// 같은 아티스트가 이어지는 구간은 한 번만 확인하고 결정을 재사용한다.
/// 경계를 다시 넘으면 (장르는 캐시에서 오더라도) 다시 확인을 받는다.
/// q 응답은 남은 배치 전체를 중단한다.
pub fn run<S, T>(
    tracks: &mut [T],
    resolver: &mut GenreResolver<S>,
    ui: &mut dyn Interact,
) -> Result<RunCounters>
where
    S: TagSource,
    T: Track,
{
    let mut counters = RunCounters::default();
    let mut current: Option<Artist> = None;
    let mut last: Option<Decision> = None;

    for track in tracks.iter_mut() {
        let boundary = match &current {
            Some(artist) => artist.name != track.artist(),
            None => true,
        };

        if boundary {
            let genre = resolver.resolve(track.artist());
            let artist = Artist {
                name: track.artist().to_string(),
                genre,
            };

            if artist.genre.is_empty() {
                ui.notify_no_tags(&artist.name);
                counters.skipped += 1;
                last = Some(Decision::No);
            } else {
                // 프롬프트 표시 시점에 집계 (기록 여부와 무관)
                counters.prompted += 1;
                last = Some(ui.confirm(&artist.name, &artist.genre)?);
            }
            current = Some(artist);
        }

        match last {
            Some(Decision::Yes) => {
                if let Some(artist) = &current {
                    if track.grouping() == Some(artist.genre.as_str()) {
                        counters.identical += 1;
                    } else {
                        track.set_grouping(&artist.genre)?;
                        counters.written += 1;
                    }
                }
            }
            Some(Decision::Quit) => break,
            Some(Decision::No) | None => {}
        }
    }

    Ok(counters)
}
