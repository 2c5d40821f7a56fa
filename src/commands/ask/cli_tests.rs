//! CLI parsing tests for ask command using the test DSL.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use crate::synth::StrategyKind;
    use clap::Parser;
    use rstest::rstest;

    crate::cli_required_arg_test! {
        command: "ask",
        test_name: test_ask_requires_question,
        required_arg: "<QUESTION>",
    }

    crate::cli_option_test! {
        command: "ask",
        variant: Ask,
        test_name: test_ask_collects_question_words,
        args: ["How", "many", "catchments?"],
        field: question,
        expected: vec!["How", "many", "catchments?"],
    }

    crate::cli_option_test! {
        command: "ask",
        variant: Ask,
        test_name: test_ask_with_execute,
        args: ["catchments", "--execute"],
        field: execute,
        expected: true,
    }

    crate::cli_option_test! {
        command: "ask",
        variant: Ask,
        test_name: test_ask_with_short_execute,
        args: ["-x", "catchments"],
        field: execute,
        expected: true,
    }

    crate::cli_option_test! {
        command: "ask",
        variant: Ask,
        test_name: test_ask_with_crew_strategy,
        args: ["catchments", "--strategy", "crew"],
        field: strategy,
        expected: Some(StrategyKind::Crew),
    }

    crate::cli_defaults_test! {
        command: "ask",
        variant: Ask,
        required_args: ["catchments"],
        defaults: {
            execute: false,
            strategy: None,
        },
    }

    crate::cli_error_test! {
        command: "ask",
        test_name: test_ask_rejects_unknown_strategy,
        args: ["catchments", "--strategy", "swarm"],
    }
}
