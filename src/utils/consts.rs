/// Log level (overridable via RUST_LOG)
pub const LOG_LEVEL: &str = "info";

// ============================================================================
// Capture Parameters
// ============================================================================

/// First field of the row that separates scope metadata from sample rows
pub const HEADER_SENTINEL: &str = "index";

/// Column holding the voltage reading (0-based)
pub const DEFAULT_VALUE_COLUMN: usize = 1;

/// WAV samples are normalized to [-1, 1] and scaled by this to look like scope readings
pub const DEFAULT_WAV_SCALE: f32 = 1000.0;

// ============================================================================
// Physical Layer Parameters (10BASE-T)
// ============================================================================

/// Voltage at or below which the first preamble excursion is recognized
pub const DEFAULT_THRESHOLD: f32 = -500.0;

/// Capture sample rate (MSa/s)
pub const DEFAULT_SAMPLE_RATE_MHZ: f32 = 250.0;

/// 10BASE-T bit rate (Mb/s)
pub const ETHERNET_BIT_RATE_MHZ: f32 = 10.0;

/// Fixed-window tolerance (± samples around nominal spacing)
pub const DEFAULT_WINDOW: usize = 6;

/// Ideal-position bounds as fractions of the nominal bit spacing
pub const DEFAULT_MIN_SPACING: f32 = 0.60;
pub const DEFAULT_MAX_SPACING: f32 = 1.30;

/// Largest accepted ideal-position upper bound, in bit periods
pub const MAX_SPACING_LIMIT: f32 = 4.0;

/// Largest accepted bit period in samples
pub const MAX_SAMPLES_PER_BIT: f32 = 1_000_000.0;

/// Preamble (7 bytes) + SFD (1 byte) on the wire
pub const PREAMBLE_BITS: usize = 64;

// ============================================================================
// Synthesizer Parameters
// ============================================================================

/// Peak voltage of a synthesized waveform
pub const DEFAULT_AMPLITUDE: f32 = 1000.0;

/// Quiet samples placed before and after a synthesized frame
pub const DEFAULT_IDLE_SAMPLES: usize = 100;
