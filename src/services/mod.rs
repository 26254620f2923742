pub mod schematics;
