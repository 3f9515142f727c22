// Integration tests for the codegraph analysis pipeline.

mod integration {
    mod cli_test;
    mod end_to_end_test;
    mod output_test;
    mod walker_test;
}
