pub mod prepare_modules;
pub mod set_parameters;
