//! Shared constants used across the application

/// Query offered to first-time users before anything has been asked.
pub const SAMPLE_QUERY: &str = "In a motor accident claim where the deceased was self-employed and aged 54–55 years at the time of death, is the claimant entitled to an addition towards future prospects in computing compensation under Section 166 of the Motor Vehicles Act, 1988? If so, how much?";

/// Narrative returned by the built-in sample backend.
pub const SAMPLE_ANSWER: &str = "Yes, under Section 166 of the Motor Vehicles Act, 1988, the claimants are entitled to an addition for future prospects even when the deceased was self-employed and aged 54–55 years at the time of the accident. In *Dani Devi v. Pritam Singh*, the Court held that **10% of the deceased's annual income** should be added as future prospects.";

pub const SAMPLE_CITATION_TEXT: &str = "as the age of the deceased at the time of accident was held to be about 54-55 years by the learned Tribunal, being self-employed, as such, 10% of annual income should have been awarded on account of future prospects.";

pub const SAMPLE_CITATION_SOURCE: &str = "Dani_Devi_v_Pritam_Singh.pdf";

pub const SAMPLE_CITATION_PARAGRAPH: &str = "Para 7";

pub const SAMPLE_CITATION_LINK: &str = "https://lexisingapore-my.sharepoint.com/:b:/g/personal/harshit_lexi_sg/EdOegeiR_gdBvQxdyW4xE6oBCDgj5E4Bo5wjvhPHpqgIuQ?e=TEu4vz";

/// Simulated answer latency of the sample backend, in milliseconds.
pub const DEFAULT_SAMPLE_LATENCY_MS: u64 = 1500;

/// Environment variable that overrides the configured backend URL.
pub const BACKEND_URL_ENV: &str = "LEXI_BACKEND_URL";

/// Environment variable consulted for the log filter before `RUST_LOG`.
pub const LOG_FILTER_ENV: &str = "LEXI_LOG";
