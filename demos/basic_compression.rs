use nen::{DirStore, HuffmanCodec, RasterShape};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A fake 32x32 single-band image: mostly dark with a few bright pixels.
    let width = 32u32;
    let height = 32u32;
    let pixels: Vec<u8> = (0..width * height)
        .map(|i| match i % 97 {
            0 => 255,
            1..=10 => 40,
            _ => 3,
        })
        .collect();

    println!("📝 Created sample band: {} bytes", pixels.len());

    let store_dir = std::env::temp_dir().join("nen-demo-store");
    let mut store = DirStore::open(&store_dir)?;
    let codec = HuffmanCodec::default();

    let artifact = codec.compress_into_store(
        &mut store,
        "sample_band",
        &pixels,
        Some(RasterShape::new(width, height)),
    )?;
    let stats = artifact.stats();

    println!(
        "🗜️  Compressed to: {} bytes ({:.1}% of original)",
        stats.packed_bytes,
        stats.ratio() * 100.0
    );

    let (restored, shape) = codec.decompress_from_store(&store, "sample_band")?;

    if restored == pixels {
        println!("✅ Decompression successful! Data matches exactly.");
    } else {
        println!("❌ Decompression failed! Data mismatch.");
        return Err("Decompression verification failed".into());
    }
    if let Some(shape) = shape {
        println!("📐 Stored shape: {}x{}", shape.width, shape.height);
    }

    std::fs::remove_dir_all(&store_dir)?;
    println!("🧹 Cleaned up temporary files");

    Ok(())
}
