use crate::model::{MaintenanceRequest, Status, format_timestamp, now_kst};
use anyhow::Result;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::{Path, PathBuf};

const LAST_COL: u16 = 7;

const HEADERS: [&str; 8] = [
    "신청 일시",
    "신청자",
    "연락처",
    "층",
    "교실명",
    "신청 내용",
    "해결 상태",
    "메모",
];

pub fn output_path(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| {
        let mut out: PathBuf = input.into();
        out.set_extension("xlsx");
        out
    })
}

struct ReportFormats {
    title: Format,
    header: Format,
    cell: Format,
    center_bold: Format,
    left_text: Format,
}

impl ReportFormats {
    fn new() -> Self {
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(18)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            header: Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            cell: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            center_bold: Format::new()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin)
                .set_bold()
                .set_align(FormatAlign::VerticalCenter),
            left_text: Format::new()
                .set_align(FormatAlign::Left)
                .set_border(FormatBorder::Thin)
                .set_text_wrap()
                .set_align(FormatAlign::VerticalCenter),
        }
    }
}

fn section_title(status: Status, count: usize) -> String {
    match status {
        Status::Submitted => format!("해결 중 ({}건)", count),
        Status::Resolved => format!("완료 목록 ({}건)", count),
    }
}

fn write_report_header(ws: &mut Worksheet, generated: &str, fmt: &ReportFormats) -> Result<u32> {
    const TITLE_ROW_HEIGHT: f64 = 30.0;

    ws.set_row_height(0, TITLE_ROW_HEIGHT)?;
    ws.merge_range(0, 0, 0, LAST_COL, "유지보수 서비스 신청 게시판", &fmt.title)?;
    ws.merge_range(
        1,
        0,
        1,
        LAST_COL,
        &format!("생성 일시: {}", generated),
        &fmt.center_bold,
    )?;
    Ok(2)
}

fn write_request_row(
    ws: &mut Worksheet,
    row: u32,
    r: &MaintenanceRequest,
    fmt: &ReportFormats,
) -> Result<()> {
    ws.write_string_with_format(row, 0, &r.date, &fmt.cell)?;
    ws.write_string_with_format(row, 1, &r.applicant, &fmt.cell)?;
    ws.write_string_with_format(row, 2, &r.contact, &fmt.cell)?;
    ws.write_number_with_format(row, 3, r.floor as f64, &fmt.cell)?;
    ws.write_string_with_format(row, 4, &r.classroom, &fmt.cell)?;
    ws.write_string_with_format(row, 5, &r.content, &fmt.left_text)?;
    ws.write_string_with_format(row, 6, r.status.label(), &fmt.cell)?;
    ws.write_string_with_format(row, 7, &r.memo, &fmt.left_text)?;
    Ok(())
}

fn write_section(
    ws: &mut Worksheet,
    start_row: u32,
    status: Status,
    table: &[MaintenanceRequest],
    fmt: &ReportFormats,
) -> Result<u32> {
    let rows: Vec<_> = table.iter().filter(|r| r.status == status).collect();
    ws.merge_range(
        start_row,
        0,
        start_row,
        LAST_COL,
        &section_title(status, rows.len()),
        &fmt.center_bold,
    )?;
    let mut row = start_row + 1;
    for (i, h) in HEADERS.iter().enumerate() {
        ws.write_string_with_format(row, i as u16, *h, &fmt.header)?;
    }
    row += 1;

    if rows.is_empty() {
        for col in 0..=LAST_COL {
            ws.write_string_with_format(row, col, "/", &fmt.cell)?;
        }
        return Ok(row + 1);
    }
    for r in rows {
        write_request_row(ws, row, r, fmt)?;
        row += 1;
    }
    Ok(row)
}

fn set_column_widths(ws: &mut Worksheet) -> Result<()> {
    let widths = [22, 10, 16, 6, 12, 40, 10, 24];
    for (col, w) in widths.iter().enumerate() {
        ws.set_column_width(col as u16, *w)?;
    }
    Ok(())
}

/// Writes the pending and completed sections to an xlsx workbook. Delete codes are left out.
pub fn export_board(table: &[MaintenanceRequest], output: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let fmt = ReportFormats::new();

    let row = write_report_header(worksheet, &format_timestamp(now_kst()), &fmt)?;
    let row = write_section(worksheet, row, Status::Submitted, table, &fmt)?;
    write_section(worksheet, row + 1, Status::Resolved, table, &fmt)?;

    set_column_widths(worksheet)?;
    workbook.save(output)?;
    println!("보고서가 생성되었습니다: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn default_output_swaps_extension() {
        assert_eq!(
            output_path(Path::new("data/maintenance_requests.csv"), None),
            PathBuf::from("data/maintenance_requests.xlsx")
        );
        assert_eq!(
            output_path(Path::new("a.csv"), Some("b.xlsx".into())),
            PathBuf::from("b.xlsx")
        );
    }

    #[test]
    fn section_titles_carry_counts() {
        assert_eq!(section_title(Status::Submitted, 3), "해결 중 (3건)");
        assert_eq!(section_title(Status::Resolved, 0), "완료 목록 (0건)");
    }

    #[test]
    fn exports_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("board.xlsx");
        let table = vec![MaintenanceRequest {
            date: "2025-03-10 월 14:05:09".into(),
            applicant: "Kim".into(),
            contact: "010-0000-0000".into(),
            floor: 3,
            classroom: "301".into(),
            content: "Broken light".into(),
            status: Status::Submitted,
            memo: String::new(),
            delete_code: "0007".into(),
            id: Uuid::now_v7(),
        }];
        export_board(&table, &out).unwrap();
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
    }
}
