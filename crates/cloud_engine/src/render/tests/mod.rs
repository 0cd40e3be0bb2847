//! Whole-pipeline tests for the cloud pass
