use actix_multipart::Multipart;
use futures_util::StreamExt;

/// 读取 multipart 中名为 `file` 的字段，超过大小上限立即停止
pub(super) async fn read_file_from_multipart(
    payload: &mut Multipart,
    max_file_size: usize,
) -> Result<Vec<u8>, String> {
    let mut file_bytes = Vec::new();
    let mut found = false;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("读取字段失败: {e}"))?;

        if field.name() != Some("file") {
            continue;
        }
        found = true;

        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| format!("读取数据失败: {e}"))?;
            if file_bytes.len() + data.len() > max_file_size {
                return Err(format!("文件大小超过限制 ({max_file_size} 字节)"));
            }
            file_bytes.extend_from_slice(&data);
        }
    }

    if !found {
        return Err("未找到文件字段".to_string());
    }

    Ok(file_bytes)
}
