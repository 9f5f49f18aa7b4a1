use std::path::Path;

use anyhow::Result;
use id3::{frame::Frame, Tag, TagLike, Version};

use crate::core::batch::Track;
use crate::models::{Mp3File, TrackTags};

/// ID3 "Content group description" 프레임. iTunes의 Grouping 열이 읽는 자리.
const GROUPING_FRAME: &str = "TIT1";

/// MP3 파일에서 아티스트/제목/그룹 태그를 읽는다.
/// 태그가 아예 없는 파일은 빈 TrackTags로 취급한다.
pub fn read_tags(path: &Path) -> Result<TrackTags> {
    let tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(id3::Error {
            kind: id3::ErrorKind::NoTag,
            ..
        }) => return Ok(TrackTags::default()),
        Err(e) => return Err(e.into()),
    };

    let grouping = tag
        .get(GROUPING_FRAME)
        .and_then(|frame| frame.content().text())
        .map(|s| s.to_string());

    Ok(TrackTags {
        artist: tag.artist().map(|s| s.to_string()),
        title: tag.title().map(|s| s.to_string()),
        grouping,
    })
}

/// 장르 문자열을 그룹(TIT1) 프레임으로 기록한다. 기존 내용은 덮어쓰고
/// 다른 프레임은 건드리지 않는다.
pub fn write_grouping(path: &Path, genre: &str) -> Result<()> {
    let mut tag = Tag::read_from_path(path).unwrap_or_else(|_| Tag::new());
    tag.add_frame(Frame::text(GROUPING_FRAME, genre));
    tag.write_to_path(path, Version::Id3v24)?;
    Ok(())
}

impl Track for Mp3File {
    fn artist(&self) -> &str {
        self.tags.artist.as_deref().unwrap_or("")
    }

    fn grouping(&self) -> Option<&str> {
        self.tags.grouping.as_deref()
    }

    fn set_grouping(&mut self, genre: &str) -> Result<()> {
        write_grouping(&self.path, genre)?;
        self.tags.grouping = Some(genre.to_string());
        Ok(())
    }
}
