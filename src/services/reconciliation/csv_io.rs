//! 表格读写：导入导出共用的 CSV 约定

use actix_web::HttpResponse;
use std::io::Cursor;

use crate::errors::{LmsError, Result};

/// 成绩表列（导出顺序即导入顺序）
pub const GRADE_HEADERS: [&str; 6] = [
    "Student ID",
    "Name",
    "Email",
    "Quiz Score (40%)",
    "Manual Score (60%)",
    "Final Score (100%)",
];

/// 成绩表中可导入的列
pub const GRADE_NAME_COLUMN: usize = 1;
pub const GRADE_MANUAL_COLUMN: usize = 4;

/// 考勤表列
pub const ATTENDANCE_HEADERS: [&str; 4] = [
    "Student Name",
    "Date (YYYY-MM-DD)",
    "Status (present/absent/late/excused)",
    "Course Name",
];

/// 考勤日期格式与存储一致
pub use crate::entity::attendance::DATE_FORMAT;

/// 数据行：行号从 1 开始，不含表头
#[derive(Debug)]
pub struct Row {
    pub number: usize,
    pub cells: Vec<String>,
    /// 该行无法按 UTF-8 解码时的原因；此时 cells 为替换非法字节后的内容
    pub error: Option<String>,
}

impl Row {
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// 读取带表头的 CSV；只有整体结构问题才返回错误，单行编码问题记在行上
pub fn read_table(data: &[u8], min_columns: usize, max_rows: usize) -> Result<Table> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(LmsError::import_format("文件内容为空"));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(data));

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| LmsError::import_format(format!("读取表头失败: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(LmsError::import_format("缺少表头"));
    }
    if headers.len() < min_columns {
        return Err(LmsError::import_format(format!(
            "表头列数不足: 需要至少 {min_columns} 列，实际 {} 列",
            headers.len()
        )));
    }

    let mut rows = Vec::new();
    for (index, result) in rdr.byte_records().enumerate() {
        let record = result
            .map_err(|e| LmsError::import_format(format!("第 {} 行读取失败: {e}", index + 1)))?;
        if rows.len() >= max_rows {
            return Err(LmsError::import_format(format!(
                "单次导入最多支持 {max_rows} 行"
            )));
        }

        let mut error: Option<String> = None;
        let cells: Vec<String> = record
            .iter()
            .map(|raw| match std::str::from_utf8(raw) {
                Ok(cell) => cell.trim().to_string(),
                Err(e) => {
                    error.get_or_insert_with(|| format!("内容不是有效的 UTF-8 编码: {e}"));
                    String::from_utf8_lossy(raw).trim().to_string()
                }
            })
            .collect();

        rows.push(Row {
            number: index + 1,
            cells,
            error,
        });
    }

    Ok(Table { headers, rows })
}

/// 写出 CSV，引号由写入器处理
pub fn write_table<I>(headers: &[&str], rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(&row)?;
    }
    wtr.into_inner()
        .map_err(|e| LmsError::serialization(format!("CSV 生成失败: {e}")))
}

/// 按姓名匹配时使用的键：去掉首尾空白、合并内部空白、忽略大小写
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 导出分数统一保留两位小数
pub fn format_score(value: f64) -> String {
    format!("{value:.2}")
}

pub fn csv_response(filename: &str, data: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(data)
}
