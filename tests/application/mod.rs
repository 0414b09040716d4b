mod study_intake_test;
mod study_pipeline_test;
