mod engine_tests;
mod recommendation_tests;
