pub mod viewer2d;
