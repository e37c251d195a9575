use crate::core::ReceiptSink;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// 把發布收據寫到本地目錄
#[derive(Debug, Clone)]
pub struct LocalReceiptStore {
    base_path: String,
}

impl LocalReceiptStore {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl ReceiptSink for LocalReceiptStore {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
