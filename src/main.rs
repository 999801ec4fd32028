mod board;
mod error;
mod init;
mod model;
mod report;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use board::Board;
use error::BoardError;
use model::{DEFAULT_CONTACT, MaintenanceRequest, NewRequest, Status};

#[derive(Parser, Debug)]
#[command(author, version, about = "유지보수 서비스 신청 게시판", long_about = None)]
struct Cli {
    /// Board CSV file
    #[arg(short, long, env = "BOARD_FILE", default_value = "maintenance_requests.csv")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty board file
    Init,
    /// Submit a maintenance request
    Submit {
        /// 신청자 이름
        #[arg(short, long)]
        applicant: String,
        /// 연락처
        #[arg(short, long, default_value = DEFAULT_CONTACT)]
        contact: String,
        /// 교실 위치(층)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        floor: u8,
        /// 교실명
        #[arg(short = 'r', long)]
        classroom: String,
        /// 유지보수 신청 내용
        #[arg(short = 't', long)]
        content: String,
        /// 삭제코드 (4자리 숫자)
        #[arg(long)]
        code: String,
    },
    /// Show pending and completed requests
    List {
        #[arg(value_enum, default_value_t = Section::All)]
        section: Section,
    },
    /// Show one request in full
    Show { id: Uuid },
    /// Change status and memo
    Status {
        id: Uuid,
        #[arg(value_enum)]
        status: Status,
        #[arg(short, long, default_value = "")]
        memo: String,
    },
    /// Delete a request by its delete code
    Delete {
        id: Uuid,
        #[arg(long)]
        code: String,
    },
    /// Export the board to xlsx
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Section {
    Pending,
    Completed,
    All,
}

fn print_section(title: &str, empty: &str, rows: &[MaintenanceRequest]) {
    println!("{} ({}건)", title, rows.len());
    if rows.is_empty() {
        println!("  {}", empty);
    }
    for r in rows {
        println!("  {}  {}", r.id, r.summary());
    }
}

fn print_board(board: &Board, section: Section) -> Result<()> {
    let (pending, completed) = board.sections()?;
    if matches!(section, Section::Pending | Section::All) {
        print_section("해결 중", "현재 신청 목록이 없습니다.", &pending);
    }
    if matches!(section, Section::Completed | Section::All) {
        print_section("완료 목록", "해결된 요청이 없습니다.", &completed);
    }
    Ok(())
}

fn print_detail(r: &MaintenanceRequest) {
    println!("{}", r.summary());
    println!("신청자: {}", r.applicant);
    println!("연락처: {}", r.contact);
    println!("교실 위치: {}층 {}", r.floor, r.classroom);
    println!("신청 내용: {}", r.content);
    println!("해결 상태: {}", r.status);
    println!("메모: {}", r.memo);
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "board=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = init::board_store(&cli.file);
    let board = Board::new(store.clone());

    match cli.command {
        Commands::Init => {
            init::init_board(&cli.file)?;
        }
        Commands::Submit {
            applicant,
            contact,
            floor,
            classroom,
            content,
            code,
        } => {
            let form = NewRequest {
                applicant,
                contact,
                floor,
                classroom,
                content,
                delete_code: code,
            };
            match board.submit(form) {
                Ok(r) => println!("신청이 완료되었습니다! ({})", r.id),
                Err(e @ BoardError::Validation(_)) => {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
            print_board(&board, Section::All)?;
        }
        Commands::List { section } => print_board(&board, section)?,
        Commands::Show { id } => print_detail(&board.get(id)?),
        Commands::Status { id, status, memo } => {
            board.update_status(id, status, memo)?;
            println!("상태가 업데이트되었습니다!");
            print_board(&board, Section::All)?;
        }
        Commands::Delete { id, code } => {
            match board.delete(id, &code) {
                Ok(_) => println!("신청이 삭제되었습니다!"),
                Err(e @ BoardError::CodeMismatch) => {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
            print_board(&board, Section::All)?;
        }
        Commands::Export { output } => {
            let output = report::output_path(store.path(), output);
            report::export_board(&board.all()?, &output)?;
        }
    }
    Ok(())
}
