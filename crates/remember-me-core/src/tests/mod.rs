mod layout;
mod normalize;

use crate::{ChartConfig, Gender, PortraitRecord};

pub(crate) fn portrait(year: i32, size: &str) -> PortraitRecord {
    PortraitRecord {
        year: Some(year),
        title: format!("Portrait {year}"),
        artist: String::new(),
        sitter: String::new(),
        size: size.to_string(),
        gender: Gender::Unknown,
        thumbnail_url: String::new(),
        thumbnail_low_res_url: String::new(),
    }
}

pub(crate) fn config() -> ChartConfig {
    ChartConfig::default()
}
