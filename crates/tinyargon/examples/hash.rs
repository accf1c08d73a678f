use eyre::{Result, eyre};
use tinyargon::{HashRequest, Variant};

/// Hash a password from the command line and print the tag as hex.
///
/// Usage: `cargo run --example hash -- <password> <salt> [argon2d|argon2i|argon2id] [passes] [memory KiB] [lanes]`
fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let [password, salt, rest @ ..] = args.as_slice() else {
        println!("Usage: cargo run --example hash -- <password> <salt> [variant] [passes] [memory] [lanes]");
        return Ok(());
    };

    let variant = match rest.first().map(String::as_str) {
        None | Some("argon2id") => Variant::Argon2id,
        Some("argon2i") => Variant::Argon2i,
        Some("argon2d") => Variant::Argon2d,
        Some(other) => return Err(eyre!("unknown variant: {other}")),
    };
    let number = |index: usize, default: u32| -> Result<u32> {
        rest.get(index).map_or(Ok(default), |value| value.parse().map_err(|e| eyre!("invalid number {value}: {e}")))
    };

    let request = HashRequest::new(password.as_bytes(), salt.as_bytes())
        .with_variant(variant)
        .with_time_cost(number(1, HashRequest::DEFAULT_TIME_COST)?)
        .with_memory_cost(number(2, HashRequest::DEFAULT_MEMORY_COST)?)
        .with_lanes(number(3, HashRequest::DEFAULT_LANES)?);

    let tag = tinyargon::hash(&request)?;
    let hex = tag.iter().map(|byte| format!("{byte:02x}")).collect::<String>();
    println!("{variant} t={} m={} p={}: {hex}", request.time_cost, request.memory_cost, request.lanes);
    Ok(())
}
