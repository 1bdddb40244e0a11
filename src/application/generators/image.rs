//! Image Generator - 插图生成
//!
//! `generate(description) -> 持久化 URL`
//!
//! 步骤:
//! 1. 调用图像合成服务，得到临时 URL
//! 2. 下载临时 URL 的图像字节
//! 3. 以随机对象名上传到持久化对象存储
//! 4. 返回持久化 URL（临时 URL 会过期，绝不外泄）
//!
//! 对象名由随机标识派生，与用户文本无关，避免冲突和路径注入。
//! 后续阶段失败时已上传的对象不做回收（见 DESIGN.md）。

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{
    ImageOutputConfig, ImageSynthesizerPort, ObjectStorageError, ObjectStoragePort, SynthesisError,
};

/// 插图生成错误
#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Image generation failed: {0}")]
    GenerationFailed(#[from] SynthesisError),

    #[error("Image upload failed: {0}")]
    UploadFailed(#[from] ObjectStorageError),
}

/// 插图生成器
pub struct ImageGenerator {
    synthesizer: Arc<dyn ImageSynthesizerPort>,
    storage: Arc<dyn ObjectStoragePort>,
    output_config: ImageOutputConfig,
    folder: String,
}

impl ImageGenerator {
    pub fn new(
        synthesizer: Arc<dyn ImageSynthesizerPort>,
        storage: Arc<dyn ObjectStoragePort>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            synthesizer,
            storage,
            output_config: ImageOutputConfig::default(),
            folder: folder.into(),
        }
    }

    /// 生成一张插图并持久化
    pub async fn generate(&self, description: &str) -> Result<String, ImageGenError> {
        // step 1: 合成，拿到临时 URL
        let transient_url = self
            .synthesizer
            .synthesize(description, &self.output_config)
            .await?;

        // step 2: 下载图像字节
        let bytes = self.synthesizer.download(&transient_url).await?;

        // step 3: 随机对象名上传
        let object_name = format!(
            "{}.{}",
            Uuid::new_v4().simple(),
            self.output_config.output_format
        );
        let durable_url = self
            .storage
            .upload(&bytes, &self.folder, &object_name)
            .await?;

        tracing::debug!(
            object_name = %object_name,
            size = bytes.len(),
            durable_url = %durable_url,
            "Image stored"
        );

        // step 4: 只返回持久化 URL
        Ok(durable_url)
    }
}
