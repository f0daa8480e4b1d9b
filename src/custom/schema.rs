//! RXCustomInput 输入输出声明

use crate::{
    core::{
        node_base::{InputSpec, InputType, OutputSpec, OutputType},
        types::{NODE_FLOAT, NODE_INT, NODE_STRING},
    },
    custom::parameter_set::{
        FloatRange, IntRange, CFG, DEFAULT_NEGATIVE_PROMPT, DEFAULT_PROMPT, FIELD_NAMES, HEIGHT,
        SEED, STEPS, WIDTH,
    },
    wrapper::comfy::HostChoices,
};

fn int_input(range: IntRange) -> InputType {
    InputType::int()
        .default(range.default)
        .min(range.min)
        .max(range.max)
        .step(range.step)
}

fn float_input(range: FloatRange) -> InputType {
    InputType::float()
        .default(range.default)
        .min(range.min)
        .max(range.max)
        .step(range.step)
}

/// INPUT_TYPES
pub fn input_spec(choices: &impl HostChoices) -> InputSpec {
    InputSpec::new()
        .with_required(
            "model_name",
            InputType::choices(choices.checkpoints())
                .tooltip("The name of the checkpoint (model) to load."),
        )
        .with_required(
            "prompt",
            InputType::string().multiline(true).default(DEFAULT_PROMPT),
        )
        .with_required(
            "negative_prompt",
            InputType::string()
                .multiline(true)
                .default(DEFAULT_NEGATIVE_PROMPT),
        )
        .with_optional("sampler", InputType::choices(choices.samplers()))
        .with_optional("scheduler", InputType::choices(choices.schedulers()))
        .with_optional("steps", int_input(STEPS))
        .with_optional("cfg", float_input(CFG))
        .with_optional("seed", int_input(SEED))
        .with_optional("width", int_input(WIDTH))
        .with_optional("height", int_input(HEIGHT))
}

/// RETURN_TYPES / RETURN_NAMES
pub fn output_spec(choices: &impl HostChoices) -> OutputSpec {
    let types = [
        OutputType::Choices(choices.checkpoints()),
        OutputType::Named(NODE_STRING),
        OutputType::Named(NODE_STRING),
        OutputType::Choices(choices.samplers()),
        OutputType::Choices(choices.schedulers()),
        OutputType::Named(NODE_INT),
        OutputType::Named(NODE_FLOAT),
        OutputType::Named(NODE_INT),
        OutputType::Named(NODE_INT),
        OutputType::Named(NODE_INT),
    ];

    types
        .into_iter()
        .zip(FIELD_NAMES)
        .fold(OutputSpec::new(), |spec, (output_type, name)| {
            spec.with_output(output_type, name)
        })
}
