use std::{fs, path::Path};

use anyhow::{Context, Result};
use tensorx::{
    DecodedTensor, ELEMENT_F16, Error, LAYOUT_NHWC, MEMORY_CPU, TensorHeader, read_header,
};

pub fn run_inspect(input: &Path) -> Result<()> {
    let bytes =
        fs::read(input).with_context(|| format!("Failed to read tensor {}", input.display()))?;
    let header = read_header(&bytes)
        .with_context(|| format!("Failed to read header of {}", input.display()))?;

    println!("{}", input.display());
    for line in describe(&header, bytes.len()) {
        println!("  {line}");
    }

    // Compression and channel problems are reported above, not treated as failures.
    match DecodedTensor::parse(&bytes) {
        Ok(tensor) if tensor.is_latent() => println!("  kind:        latent (rgb preview)"),
        Ok(_) => println!("  kind:        rgb"),
        Err(err @ (Error::CompressionUnsupported { .. } | Error::UnsupportedChannelCount { .. })) => {
            println!("  kind:        not decodable ({err})")
        }
        Err(err) => return Err(err).context("Tensor payload is malformed"),
    }
    Ok(())
}

fn describe(header: &TensorHeader, actual_len: usize) -> Vec<String> {
    vec![
        format!(
            "compression: {}",
            if header.is_compressed() {
                "fpzip".to_string()
            } else {
                format!("{:#x}", header.compression)
            }
        ),
        format!("memory:      {}", tag(header.memory_kind, MEMORY_CPU, "cpu")),
        format!("layout:      {}", tag(header.layout, LAYOUT_NHWC, "nhwc")),
        format!("element:     {}", tag(header.element_kind, ELEMENT_F16, "f16")),
        format!(
            "shape:       {}x{}x{}x{} (NxHxWxC)",
            header.batch, header.height, header.width, header.channels
        ),
        format!(
            "bytes:       {actual_len} (header declares {})",
            header.expected_len()
        ),
    ]
}

fn tag(value: u32, known: u32, name: &str) -> String {
    if value == known {
        name.to_string()
    } else {
        format!("unknown ({value:#x})")
    }
}
