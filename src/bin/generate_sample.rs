//! Write a small synthetic WikiArt folder for trying the loader offline.
//!
//! Output layout matches an extracted archive pair, so it can be passed to
//! `wikiart examples --local <out>`:
//! ```text
//! <out>/train/train/wikiart_scraped_train.csv + *.png
//! <out>/test/test/wikiart_scraped_test.csv  + *.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use log::info;

use wikiart::{Split, Style};

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Generate a synthetic WikiArt dataset folder")]
struct Args {
    /// Output directory
    #[arg(long, default_value = "sample_wikiart")]
    out: PathBuf,

    /// Images per style and split
    #[arg(long, default_value = "4")]
    per_style: usize,

    /// Edge length of the generated images in pixels
    #[arg(long, default_value = "32")]
    size: u32,
}

/// Minimal deterministic PRNG (xoshiro256**), seeded once so reruns write identical images.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_u8(&mut self) -> u8 {
        (self.next_u64() >> 56) as u8
    }
}

/// Baroque images come out dark and warm, Realism ones lighter and cooler.
fn paint(style: Style, size: u32, rng: &mut SimpleRng) -> RgbImage {
    let (base, spread) = match style {
        Style::Baroque => ([90u8, 50, 20], 40u8),
        Style::Realism => ([120u8, 140, 150], 80u8),
    };
    let tint = [rng.next_u8() % spread, rng.next_u8() % spread, rng.next_u8() % spread];
    RgbImage::from_fn(size, size, |x, y| {
        let shade = ((x + y) * 64 / (2 * size.max(1))) as u8;
        Rgb([
            base[0].saturating_add(tint[0]).saturating_add(shade),
            base[1].saturating_add(tint[1]).saturating_add(shade),
            base[2].saturating_add(tint[2]).saturating_add(shade),
        ])
    })
}

fn write_split(root: &Path, split: Split, args: &Args, rng: &mut SimpleRng) -> Result<usize> {
    // Archive folder, then the split folder inside it.
    let dir = root.join(split.name()).join(split.name());
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let manifest = dir.join(split.manifest_file());
    let mut writer = csv::Writer::from_path(&manifest)
        .with_context(|| format!("creating {}", manifest.display()))?;
    writer.write_record(["Style", "Artwork", "Link"])?;

    let mut rows = 0;
    for i in 0..args.per_style {
        for style in Style::ALL {
            let file_name = format!("{}-{}-{i}.png", split.name(), style.name().to_lowercase());
            paint(style, args.size, rng)
                .save(dir.join(&file_name))
                .with_context(|| format!("writing {file_name}"))?;

            let artwork = format!("{style} Study No. {}", i + 1);
            let link = format!("https://uploads.example.org/images/{file_name}");
            writer.write_record([style.name(), artwork.as_str(), link.as_str()])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    for split in Split::ALL {
        let rows = write_split(&args.out, split, &args, &mut rng)?;
        info!("{split}: wrote {rows} examples");
    }

    println!(
        "Wrote synthetic WikiArt splits to {} (try: wikiart examples --local {})",
        args.out.display(),
        args.out.display()
    );
    Ok(())
}
