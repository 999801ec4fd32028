use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BoardError, Result};

/// Column order of the backing file.
pub const HEADERS: [&str; 10] = [
    "date",
    "applicant",
    "contact",
    "floor",
    "classroom",
    "content",
    "status",
    "memo",
    "delete_code",
    "id",
];

pub const DEFAULT_CONTACT: &str = "031-574-0831";

const DELETE_CODE_LEN: usize = 4;
const SUMMARY_CHARS: usize = 20;
// Asia/Seoul has had no DST since 1988.
const KST_OFFSET_SECS: i32 = 9 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[serde(alias = "신청 완료")]
    Submitted,
    #[serde(alias = "해결 완료")]
    Resolved,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Submitted => "신청 완료",
            Status::Resolved => "해결 완료",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub date: String,
    pub applicant: String,
    pub contact: String,
    pub floor: u8,
    pub classroom: String,
    pub content: String,
    pub status: Status,
    #[serde(default)]
    pub memo: String,
    pub delete_code: String,
    // Files written before ids existed get one on load.
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
}

impl MaintenanceRequest {
    /// One-line list entry; the full content is shown by the detail view.
    pub fn summary(&self) -> String {
        let head: String = self.content.chars().take(SUMMARY_CHARS).collect();
        format!(
            "[{}층_{}] {}...   ({})",
            self.floor, self.classroom, head, self.date
        )
    }
}

/// Raw form input for a new request.
#[derive(Debug, Clone, Default)]
pub struct NewRequest {
    pub applicant: String,
    pub contact: String,
    pub floor: u8,
    pub classroom: String,
    pub content: String,
    pub delete_code: String,
}

impl NewRequest {
    pub fn validate(&self) -> Result<String> {
        let required = [
            ("신청자 이름", &self.applicant),
            ("연락처", &self.contact),
            ("교실명", &self.classroom),
            ("신청 내용", &self.content),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.is_empty()) {
            return Err(BoardError::Validation(format!("{name} 항목이 비어있습니다")));
        }
        pad_delete_code(&self.delete_code)
    }
}

/// Left-pads `input` with zeros to four characters and checks it is four ASCII digits.
pub fn pad_delete_code(input: &str) -> Result<String> {
    let len = input.chars().count();
    let padded = if len < DELETE_CODE_LEN {
        format!("{}{}", "0".repeat(DELETE_CODE_LEN - len), input)
    } else {
        input.to_string()
    };
    if padded.len() == DELETE_CODE_LEN && padded.bytes().all(|b| b.is_ascii_digit()) {
        Ok(padded)
    } else {
        Err(BoardError::Validation(format!(
            "삭제코드 {input:?}는 {DELETE_CODE_LEN}자리 숫자가 아닙니다"
        )))
    }
}

pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("offset within a day")
}

pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

fn korean_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "월",
        Weekday::Tue => "화",
        Weekday::Wed => "수",
        Weekday::Thu => "목",
        Weekday::Fri => "금",
        Weekday::Sat => "토",
        Weekday::Sun => "일",
    }
}

pub fn format_timestamp(at: DateTime<FixedOffset>) -> String {
    format!(
        "{} {} {}",
        at.format("%Y-%m-%d"),
        korean_weekday(at.weekday()),
        at.format("%H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn pads_short_codes() {
        assert_eq!(pad_delete_code("7").unwrap(), "0007");
        assert_eq!(pad_delete_code("0423").unwrap(), "0423");
        assert_eq!(pad_delete_code("").unwrap(), "0000");
    }

    #[test]
    fn rejects_bad_codes() {
        assert_matches!(
            pad_delete_code("12345"),
            Err(BoardError::Validation(msg)) if msg == "삭제코드 \"12345\"는 4자리 숫자가 아닙니다"
        );
        assert_matches!(pad_delete_code("12a"), Err(BoardError::Validation(_)));
        assert_matches!(pad_delete_code("-12"), Err(BoardError::Validation(_)));
        assert_matches!(pad_delete_code("١٢"), Err(BoardError::Validation(_)));
    }

    #[test]
    fn validate_requires_fields() {
        let form = NewRequest {
            applicant: "Kim".into(),
            contact: "010-0000-0000".into(),
            floor: 3,
            classroom: "".into(),
            content: "Broken light".into(),
            delete_code: "7".into(),
        };
        assert_matches!(form.validate(), Err(BoardError::Validation(msg)) if msg == "교실명 항목이 비어있습니다");
    }

    #[test]
    fn timestamp_uses_korean_weekday() {
        let at = kst().with_ymd_and_hms(2025, 3, 10, 14, 5, 9).unwrap();
        assert_eq!(format_timestamp(at), "2025-03-10 월 14:05:09");
        let sunday = kst().with_ymd_and_hms(2025, 3, 16, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(sunday), "2025-03-16 일 00:00:00");
    }

    #[test]
    fn seoul_offset_applies() {
        let utc = Utc.with_ymd_and_hms(2025, 3, 9, 20, 0, 0).unwrap();
        let local = utc.with_timezone(&kst());
        assert_eq!(format_timestamp(local), "2025-03-10 월 05:00:00");
    }

    #[test]
    fn summary_truncates_by_chars() {
        let req = MaintenanceRequest {
            date: "2025-03-10 월 14:05:09".into(),
            applicant: "김".into(),
            contact: DEFAULT_CONTACT.into(),
            floor: 2,
            classroom: "과학실".into(),
            content: "형광등이 깜빡거리고 소음이 심하게 나서 수업이 어렵습니다".into(),
            status: Status::Submitted,
            memo: String::new(),
            delete_code: "1234".into(),
            id: Uuid::now_v7(),
        };
        assert_eq!(
            req.summary(),
            "[2층_과학실] 형광등이 깜빡거리고 소음이 심하게 나...   (2025-03-10 월 14:05:09)"
        );
    }
}
