//! Scenario tests for the whole pipeline, plus the harness the per-module
//! translator tests share.


mod pipeline;
