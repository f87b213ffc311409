pub mod signin;
pub mod signup;

pub use signin::signin;
pub use signup::signup;
