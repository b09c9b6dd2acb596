// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const DEFAULT_LOAD_FAILED: &str = "ไม่สามารถโหลดข้อมูลได้ กรุณาตรวจสอบการเชื่อมต่อ";
pub const DEFAULT_EMPTY_SELECTION: &str = "กรุณาเลือกรายการที่ต้องการพิมพ์";
pub const DEFAULT_NO_RESULTS: &str = "ไม่พบข้อมูล";
pub const DEFAULT_ALL_SHELVES: &str = "ทั้งหมด";
pub const DEFAULT_LOADING: &str = "กำลังโหลดข้อมูล...";

/// User-facing strings. Defaults are Thai; config may override any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub load_failed: String,
    pub empty_selection: String,
    pub no_results: String,
    pub all_shelves: String,
    pub loading: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            load_failed: DEFAULT_LOAD_FAILED.to_owned(),
            empty_selection: DEFAULT_EMPTY_SELECTION.to_owned(),
            no_results: DEFAULT_NO_RESULTS.to_owned(),
            all_shelves: DEFAULT_ALL_SHELVES.to_owned(),
            loading: DEFAULT_LOADING.to_owned(),
        }
    }
}
