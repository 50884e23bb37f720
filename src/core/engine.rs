use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load; returns the metadata file path.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting diskmag conversion...");
        self.monitor.log_stats("Start");

        let images = self.pipeline.extract().await?;
        let file_count: usize = images.iter().map(|image| image.files.len()).sum();
        tracing::info!(
            "Extracted {} disk images with {} files",
            images.len(),
            file_count
        );
        self.monitor.log_stats("Extract");

        let result = self.pipeline.transform(images).await?;
        tracing::info!("Converted {} disk images", result.documents.len());
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Metadata saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExtractedImage, TransformResult};
    use crate::utils::error::DiskmagError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPipeline {
        stages: AtomicUsize,
        fail_transform: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<Vec<ExtractedImage>> {
            self.stages.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn transform(&self, _images: Vec<ExtractedImage>) -> Result<TransformResult> {
            self.stages.fetch_add(1, Ordering::SeqCst);
            if self.fail_transform {
                return Err(DiskmagError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            Ok(TransformResult::default())
        }

        async fn load(&self, _result: TransformResult) -> Result<String> {
            self.stages.fetch_add(1, Ordering::SeqCst);
            Ok("metadata.json".to_string())
        }
    }

    #[test]
    fn test_run_drives_all_stages() {
        let engine = ConversionEngine::new(CountingPipeline::default());

        let path = tokio_test::block_on(engine.run()).unwrap();
        assert_eq!(path, "metadata.json");
        assert_eq!(engine.pipeline.stages.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_run_stops_at_failing_stage() {
        let engine = ConversionEngine::new_with_monitoring(
            CountingPipeline {
                fail_transform: true,
                ..Default::default()
            },
            true,
        );

        let result = tokio_test::block_on(engine.run());
        assert!(matches!(result, Err(DiskmagError::ProcessingError { .. })));
        assert_eq!(engine.pipeline.stages.load(Ordering::SeqCst), 2);
    }
}
