mod argon2_hasher;
mod token_generator;

pub use argon2_hasher::{
  Argon2PasswordHasher, DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM,
};
pub use token_generator::SecureTokenGenerator;
