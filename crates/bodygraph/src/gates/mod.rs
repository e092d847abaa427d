pub mod activation;
pub mod wheel;

pub use activation::{
    activations_from_set, extract_activations, find_activation, ExtractOptions, GateActivation,
};
pub use wheel::{
    gate_for_longitude, gate_line, gate_start, line_for_longitude, GateLine, WheelAlignment,
    GATE_ARC, GATE_WHEEL, LINE_ARC, MANDALA_START,
};
