use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::Input;

use crate::config::{self, TaggingConfig};
use crate::core::batch::{self, Decision, Interact};
use crate::core::resolver::GenreResolver;
use crate::core::scanner;
use crate::sources::lastfm::LastfmClient;

#[derive(Parser)]
#[command(
    name = "grouptag",
    about = "Last.fm 태그를 MP3 그룹(Grouping) 필드에 기록하는 배치 태거"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 디렉토리를 스캔하여 그룹 태그 현황 표시
    Scan {
        /// 스캔할 디렉토리
        directory: PathBuf,
    },
    /// Last.fm 태그를 가져와 그룹 필드에 기록
    Tag {
        /// MP3 파일 또는 디렉토리
        path: PathBuf,
        /// 태그를 채택할 최소 인기도 (설정 파일 기본값 덮어쓰기)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        min_count: Option<u32>,
        /// 고려할 최대 태그 수 (설정 파일 기본값 덮어쓰기)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_tags: Option<u32>,
        /// 묻지 않고 모든 아티스트에 y로 응답
        #[arg(short, long)]
        quiet: bool,
    },
    /// 기본 설정 편집
    Config,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan { directory } => cmd_scan(&directory),
        Commands::Tag {
            path,
            min_count,
            max_tags,
            quiet,
        } => cmd_tag(&path, min_count, max_tags, quiet),
        Commands::Config => cmd_config(),
    }
}

fn cmd_scan(directory: &PathBuf) -> Result<()> {
    let files = scanner::scan_directory(directory)?;

    if files.is_empty() {
        println!("{}에서 MP3 파일을 찾을 수 없습니다", directory.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["파일", "아티스트", "제목", "그룹"]);

    for file in &files {
        table.add_row(vec![
            Cell::new(file.filename()),
            Cell::new(file.tags.display_artist()),
            Cell::new(file.tags.display_title()),
            Cell::new(file.tags.grouping.as_deref().unwrap_or("-")),
        ]);
    }

    println!("{table}");
    println!(
        "\n총 {} 파일 (그룹 있음: {}, 그룹 없음: {})",
        files.len(),
        files.iter().filter(|f| f.tags.has_grouping()).count(),
        files.iter().filter(|f| !f.tags.has_grouping()).count(),
    );

    Ok(())
}

fn cmd_tag(
    path: &PathBuf,
    min_count: Option<u32>,
    max_tags: Option<u32>,
    quiet: bool,
) -> Result<()> {
    let cfg = config::load_config();

    let mut tagging = cfg.tagging.clone();
    if let Some(v) = min_count {
        tagging.min_count = v;
    }
    if let Some(v) = max_tags {
        tagging.max_tags = v;
    }
    // 원격 조회가 시작되기 전에 설정을 검증한다
    tagging.validate()?;

    let mut files = scanner::scan_path(path)?;
    if files.is_empty() {
        println!("{}에서 MP3 파일을 찾을 수 없습니다", path.display());
        return Ok(());
    }

    println!("트랙 {}개를 처리합니다.\n", files.len());

    let client = LastfmClient::new()?;
    let mut resolver = GenreResolver::new(client, tagging.min_count, tagging.max_tags as usize);
    let mut ui = ConsoleUi { quiet };

    let counters = batch::run(&mut files, &mut resolver, &mut ui)?;

    println!("\n완료!\n");
    println!("확인 요청:\t{}", counters.prompted);
    println!("기록됨:\t\t{}", counters.written);
    println!("건너뜀:\t\t{}", counters.skipped);
    println!("이미 동일:\t{}", counters.identical);
    Ok(())
}

/// 콘솔 프롬프트 구현. quiet 모드에서는 묻지 않고 y로 답한다.
struct ConsoleUi {
    quiet: bool,
}

impl Interact for ConsoleUi {
    fn notify_no_tags(&mut self, artist: &str) {
        println!("[ SKIP ] \"{}\"에 대한 태그를 찾을 수 없습니다.", artist);
    }

    fn confirm(&mut self, artist: &str, genre: &str) -> Result<Decision> {
        println!("[ SUCCESS ] \"{}\"을(를) \"{}\"(으)로 태깅합니다.", artist, genre);

        if self.quiet {
            return Ok(Decision::Yes);
        }

        let answer: String = Input::new()
            .with_prompt("계속할까요? (y/n/q)")
            .validate_with(|input: &String| -> Result<(), &str> {
                match input.trim().to_lowercase().as_str() {
                    "y" | "n" | "q" => Ok(()),
                    _ => Err("y, n, q 중 하나를 입력하세요"),
                }
            })
            .interact_text()?;

        Ok(match answer.trim().to_lowercase().as_str() {
            "y" => Decision::Yes,
            "q" => Decision::Quit,
            _ => Decision::No,
        })
    }
}

fn cmd_config() -> Result<()> {
    let mut cfg = config::load_config();

    println!("grouptag 기본 설정\n");

    let min_count: u32 = Input::new()
        .with_prompt("태그 최소 인기도 (정수)")
        .with_initial_text(cfg.tagging.min_count.to_string())
        .validate_with(|v: &u32| -> Result<(), &str> {
            if *v == 0 {
                Err("1 이상이어야 합니다")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let max_tags: u32 = Input::new()
        .with_prompt("저장할 최대 태그 수 (정수)")
        .with_initial_text(cfg.tagging.max_tags.to_string())
        .validate_with(|v: &u32| -> Result<(), &str> {
            if *v == 0 {
                Err("1 이상이어야 합니다")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    cfg.tagging = TaggingConfig {
        min_count,
        max_tags,
    };

    config::save_config(&cfg)?;
    println!("\n설정이 저장되었습니다!");
    Ok(())
}
