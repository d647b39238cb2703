// Settings message stored in tuningfork_settings.bin.
// Field numbers follow tuningfork.proto so files written by other tools load.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Settings {
    #[prost(message, optional, tag = "1")]
    pub aggregation_strategy: Option<AggregationStrategy>,
    #[prost(message, repeated, tag = "2")]
    pub histograms: Vec<Histogram>,
    #[prost(string, optional, tag = "3")]
    pub base_uri: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub api_key: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub default_fidelity_parameters_filename: Option<String>,
    #[prost(int32, optional, tag = "6")]
    pub initial_request_timeout_ms: Option<i32>,
    #[prost(int32, optional, tag = "7")]
    pub ultimate_request_timeout_ms: Option<i32>,
    #[prost(int32, optional, tag = "8")]
    pub loading_annotation_index: Option<i32>,
    #[prost(int32, optional, tag = "9")]
    pub level_annotation_index: Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AggregationStrategy {
    #[prost(enumeration = "Submission", optional, tag = "1")]
    pub method: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub intervalms_or_count: Option<i32>,
    #[prost(int32, optional, tag = "3")]
    pub max_instrumentation_keys: Option<i32>,
    #[prost(int32, repeated, packed = "false", tag = "4")]
    pub annotation_enum_size: Vec<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Submission {
    Undefined = 0,
    TimeBased = 1,
    TickBased = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Histogram {
    #[prost(int32, optional, tag = "1")]
    pub instrument_key: Option<i32>,
    #[prost(float, optional, tag = "2")]
    pub bucket_min: Option<f32>,
    #[prost(float, optional, tag = "3")]
    pub bucket_max: Option<f32>,
    #[prost(int32, optional, tag = "4")]
    pub n_buckets: Option<i32>,
}

/// Why a settings message cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsProblem {
    #[error("aggregation strategy is missing")]
    NoAggregationStrategy,
    #[error("aggregation method is undefined")]
    UndefinedSubmission,
    #[error("aggregation interval must be positive")]
    NonPositiveInterval,
    #[error("annotation enum sizes {found:?} do not match the annotation message {expected:?}")]
    AnnotationEnumSizes { expected: Vec<i32>, found: Vec<i32> },
    #[error("histogram {index} has bucket_min >= bucket_max")]
    EmptyHistogramRange { index: usize },
}

impl Settings {
    /// Time-based aggregation, the editor's default.
    pub fn time_based(interval_ms: i32, max_instrumentation_keys: i32) -> Self {
        Self {
            aggregation_strategy: Some(AggregationStrategy {
                method: Some(Submission::TimeBased as i32),
                intervalms_or_count: Some(interval_ms),
                max_instrumentation_keys: Some(max_instrumentation_keys),
                annotation_enum_size: Vec::new(),
            }),
            ..Self::default()
        }
    }

    pub fn submission(&self) -> Submission {
        self.aggregation_strategy
            .as_ref()
            .and_then(|s| s.method)
            .and_then(|m| Submission::try_from(m).ok())
            .unwrap_or(Submission::Undefined)
    }

    /// Check the settings against the annotation enum sizes the game uses.
    pub fn validate(&self, annotation_enum_sizes: &[i32]) -> Result<(), SettingsProblem> {
        let strategy = self
            .aggregation_strategy
            .as_ref()
            .ok_or(SettingsProblem::NoAggregationStrategy)?;
        if self.submission() == Submission::Undefined {
            return Err(SettingsProblem::UndefinedSubmission);
        }
        if strategy.intervalms_or_count.unwrap_or(0) <= 0 {
            return Err(SettingsProblem::NonPositiveInterval);
        }
        if !strategy.annotation_enum_size.is_empty()
            && strategy.annotation_enum_size != annotation_enum_sizes
        {
            return Err(SettingsProblem::AnnotationEnumSizes {
                expected: annotation_enum_sizes.to_vec(),
                found: strategy.annotation_enum_size.clone(),
            });
        }
        for (index, histogram) in self.histograms.iter().enumerate() {
            if let (Some(min), Some(max)) = (histogram.bucket_min, histogram.bucket_max) {
                if min >= max {
                    return Err(SettingsProblem::EmptyHistogramRange { index });
                }
            }
        }
        Ok(())
    }
}
