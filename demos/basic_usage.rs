//! Basic usage example of the hybrid buffer
//!
//! Run with `cargo run --example basic_usage` to see the transition traces.

use hybridbuf::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Inline to Heap ===\n");

    let mut buf = SmallWordVec::new();
    for i in 0..64 {
        buf.append(i);
    }
    println!(
        "64 elements: {:?}, capacity {}",
        buf.representation(),
        buf.capacity()
    );

    buf.append(64);
    println!(
        "65 elements: {:?}, capacity {}",
        buf.representation(),
        buf.capacity()
    );

    buf.clear();
    buf.append(100);
    println!(
        "After clear + append: {:?}, len {}",
        buf.representation(),
        buf.len()
    );

    println!("\n=== Checked Access ===\n");

    println!("first = {}", buf.try_first()?);
    match buf.try_get(5) {
        Ok(value) => println!("get(5) = {}", value),
        Err(err) => println!("get(5) rejected: {}", err),
    }

    println!("\n=== Zero-Copy Views ===\n");

    let text = SmallByteVec::from_slice(b"tokenize this text without copying");
    let view = text.raw_view();
    let word = view.subview(9, 4);
    // SAFETY: `text` is neither mutated nor moved while `word` is read.
    let word = unsafe { word.as_slice() };
    println!("subview(9, 4) = {:?}", String::from_utf8_lossy(word));
    text.check_view(&view)?;

    println!("\n=== SIMD Byte Operations ===\n");

    let bytes: Vec<u8> = (0..64).collect();
    let a = SmallByteVec::from_slice(&bytes);
    let mut b = a.clone();
    println!("sum(0..64) = {}", a.simd_sum());
    println!("a == b: {}", a.simd_equals(&b));
    b.set(30, 0xFF);
    println!("after flipping byte 30, a == b: {}", a.simd_equals(&b));

    println!("\n=== Secure Erase ===\n");

    let mut secret = SmallByteVec::from_slice(b"hunter2");
    secret.burn();
    println!("burned: len {}, {:?}", secret.len(), secret.representation());

    Ok(())
}
