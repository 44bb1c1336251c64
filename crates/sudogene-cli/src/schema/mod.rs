pub mod evolution_result;
