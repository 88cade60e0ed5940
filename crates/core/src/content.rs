//! Static copy shown on the page.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("expected YYYY-MM-DD, got {0:?}")]
    Format(String),
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// A proleptic Gregorian calendar date without time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CivilDate {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Days since 1970-01-01 (negative before).
    pub fn to_epoch_days(&self) -> i64 {
        let month = i64::from(self.month);
        let day = i64::from(self.day);
        let year = i64::from(self.year) - i64::from(self.month <= 2);
        let era = if year >= 0 { year } else { year - 399 } / 400;
        let year_of_era = year - era * 400;
        let day_of_year = (153 * ((month + 9) % 12) + 2) / 5 + day - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * 146_097 + day_of_era - 719_468
    }

    /// Calendar days from `self` to `later` (negative if `later` is earlier).
    pub fn days_until(&self, later: &CivilDate) -> i64 {
        later.to_epoch_days() - self.to_epoch_days()
    }
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl FromStr for CivilDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || DateParseError::Format(s.to_string());
        let mut parts = s.splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format_err());
        };
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return Err(format_err());
        }
        let year: i32 = y.parse().map_err(|_| format_err())?;
        let month: u32 = m.parse().map_err(|_| format_err())?;
        let day: u32 = d.parse().map_err(|_| format_err())?;
        CivilDate::new(year, month, day).ok_or(DateParseError::OutOfRange { year, month, day })
    }
}

impl std::fmt::Display for CivilDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// Serialized as the ISO string rather than a struct.

impl Serialize for CivilDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CivilDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Value column of a basic-info row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoValue {
    Text(String),
    /// Rendered as the number of calendar days since the date.
    DaysSince(CivilDate),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRow {
    pub label: String,
    pub value: InfoValue,
}

impl InfoRow {
    pub fn text(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: InfoValue::Text(value.to_string()),
        }
    }

    pub fn resolve(&self, today: &CivilDate) -> String {
        match &self.value {
            InfoValue::Text(text) => text.clone(),
            InfoValue::DaysSince(date) => format!("{} 天", date.days_until(today)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkService {
    GitHub,
    X,
    Telegram,
    Other,
}

impl LinkService {
    pub fn name(self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::X => "X",
            Self::Telegram => "Telegram",
            Self::Other => "Link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub service: LinkService,
    pub handle: String,
    pub url: String,
}

impl ExternalLink {
    fn new(service: LinkService, handle: &str, url: &str) -> Self {
        Self {
            service,
            handle: handle.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub made_by: String,
    pub made_by_url: String,
    pub maintained_by: String,
}

/// Everything the page says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileContent {
    pub title: String,
    pub avatar_src: String,
    pub preface_heading: String,
    pub preface: Vec<String>,
    pub basic_info_heading: String,
    pub basic_info: Vec<InfoRow>,
    pub links_heading: String,
    pub links: Vec<ExternalLink>,
    pub contact_prompt: String,
    pub contact_phone: String,
    /// Fetched lazily when the phone number is clicked.
    pub qr_src: String,
    pub credits: Credits,
}

impl ProfileContent {
    pub fn basic_info_rows(&self, today: &CivilDate) -> Vec<(String, String)> {
        self.basic_info
            .iter()
            .map(|row| (row.label.clone(), row.resolve(today)))
            .collect()
    }
}

impl Default for ProfileContent {
    fn default() -> Self {
        let birth = CivilDate {
            year: 2006,
            month: 2,
            day: 6,
        };
        Self {
            title: "Zubmarine's Utopia".to_string(),
            avatar_src: "assets/avatar.webp".to_string(),
            preface_heading: "理想国之春".to_string(),
            preface: vec![
                "闲来侧眼新垂柳，烟消水暖风轻。寻寻觅觅盼新晴，天苍茫处，有赤鹿食苹。".to_string(),
                "高歌对酌清梦醒，云闲日朗波平。悠悠念念忆曾经，付诸一笑，听野鹤和鸣。".to_string(),
            ],
            basic_info_heading: "基础资料".to_string(),
            basic_info: vec![
                InfoRow::text("编号", "Zubmarine"),
                InfoRow::text("内容", "基于 Cogito-Existo 协议存在的人类实体"),
                InfoRow::text("别称", "希尔 / Corlz"),
                InfoRow::text("坐标", "Guangdong, China"),
                InfoRow {
                    label: "存在".to_string(),
                    value: InfoValue::DaysSince(birth),
                },
                InfoRow::text("其他", "..."),
            ],
            links_heading: "外部链接".to_string(),
            links: vec![
                ExternalLink::new(LinkService::GitHub, "@Zubmarine", "https://github.com/Zubmarine"),
                ExternalLink::new(LinkService::X, "@AbyssumMaris", "https://x.com/AbyssumMaris"),
                ExternalLink::new(LinkService::Telegram, "@Sier Zubmarine", "https://t.me/Zubmar1ne"),
            ],
            contact_prompt: "如有问题请致电赛博移民委员会".to_string(),
            contact_phone: "+86 178 B04E CC3F".to_string(),
            qr_src: "https://s1.imagehub.cc/images/2025/04/10/d2a96881ad4298d541445b6ca06609a3.jpg"
                .to_string(),
            credits: Credits {
                made_by: "ShellWen".to_string(),
                made_by_url: "https://github.com/ShellWen".to_string(),
                maintained_by: "Zubmarine".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CivilDate {
        s.parse().unwrap()
    }

    #[test]
    fn epoch_days() {
        assert_eq!(date("1970-01-01").to_epoch_days(), 0);
        assert_eq!(date("2006-02-06").to_epoch_days(), 13_185);
        assert_eq!(date("1969-12-31").to_epoch_days(), -1);
    }

    #[test]
    fn days_until_crosses_leap_day() {
        assert_eq!(date("2024-02-28").days_until(&date("2024-03-01")), 2);
        assert_eq!(date("2006-02-06").days_until(&date("2025-04-10")), 7_003);
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(
            "2023-02-29".parse::<CivilDate>(),
            Err(DateParseError::OutOfRange {
                year: 2023,
                month: 2,
                day: 29
            })
        );
        assert!(matches!(
            "2023/02/01".parse::<CivilDate>(),
            Err(DateParseError::Format(_))
        ));
    }

    #[test]
    fn existence_row_counts_days() {
        let content = ProfileContent::default();
        let rows = content.basic_info_rows(&date("2025-04-10"));
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[4], ("存在".to_string(), "7003 天".to_string()));
    }

    #[test]
    fn dates_serialize_as_strings() {
        let json = serde_json::to_string(&InfoValue::DaysSince(date("2006-02-06"))).unwrap();
        assert_eq!(json, r#"{"days_since":"2006-02-06"}"#);
    }
}
