pub mod progress;

use crate::pipeline::DecodeReport;

pub fn print_banner() {
    eprintln!("tenbaset-rs: 10BASE-T Manchester capture decoder");
}

/// One line per byte: the MSB-first bit string and its hex value
pub fn octet_lines(report: &DecodeReport) -> Vec<String> {
    report
        .octets
        .iter()
        .map(|octet| octet.to_string())
        .collect()
}

/// Decoded bits, 64 per line
pub fn bit_lines(bits: &[u8]) -> Vec<String> {
    bits.chunks(64)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&b| if b != 0 { '1' } else { '0' })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_lines() {
        let bits: Vec<u8> = (0..70).map(|i| (i % 2) as u8).collect();
        let lines = bit_lines(&bits);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 64);
        assert_eq!(lines[1], "010101");
    }
}
