use std::fmt::Display;
use std::io::{self, Write};

use crate::error::ConvertError;
use crate::format::*;

/// Writes a GBA animation as a C header, one frame at a time.
///
/// The preamble is written by [`HeaderWriter::new`], each
/// [`write_frame`](HeaderWriter::write_frame) appends one pixel array and
/// [`finish`](HeaderWriter::finish) writes the pointer and duration tables
/// and closes the include guard.
pub struct HeaderWriter<W: Write> {
    writer: W,
    symbol: String,
    guard: String,
    fps: u32,
    duration: u16,
    frame_count: usize,
}

impl<W: Write> HeaderWriter<W> {
    /// Create a new writer and emit the comment block, include guard and
    /// `gba_types.h` include.
    ///
    /// `source_name` is only used in the leading comment.
    pub fn new(mut writer: W, symbol: &str, source_name: &str, fps: u32) -> Result<Self, ConvertError> {
        if !is_c_identifier(symbol) {
            return Err(ConvertError::InvalidSymbol(symbol.to_string()));
        }
        if fps == 0 {
            return Err(ConvertError::InvalidFrameRate(fps));
        }

        let guard = format!("{}_H", symbol.to_uppercase());

        writeln!(writer, "// Auto-generated GIF to GBA conversion")?;
        writeln!(writer, "// Original file: {source_name}")?;
        writeln!(writer, "// Input framerate: {fps} fps")?;
        writeln!(writer)?;
        writeln!(writer, "#ifndef {guard}")?;
        writeln!(writer, "#define {guard}")?;
        writeln!(writer)?;
        writeln!(writer, "#include <gba_types.h>")?;
        writeln!(writer)?;

        Ok(Self {
            writer,
            symbol: symbol.to_string(),
            guard,
            fps,
            duration: frame_duration(fps),
            frame_count: 0,
        })
    }

    /// Write one full-screen frame of packed colour words.
    pub fn write_frame(&mut self, pixels: &[u16]) -> Result<(), ConvertError> {
        if pixels.len() != FRAME_PIXELS {
            return Err(ConvertError::FrameSize {
                expected: FRAME_PIXELS,
                actual: pixels.len(),
            });
        }

        let index = self.frame_count;
        writeln!(self.writer, "// Frame {index}")?;
        write!(
            self.writer,
            "const u16 {}_frame{index}[{FRAME_PIXELS}] = {{",
            self.symbol
        )?;
        write_list(
            &mut self.writer,
            pixels.iter().map(|p| format!("0x{p:04X}")),
            PIXELS_PER_LINE,
        )?;

        self.frame_count += 1;
        log::debug!("wrote {}_frame{index}", self.symbol);
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Refreshes per frame written into the duration table.
    pub fn duration(&self) -> u16 {
        self.duration
    }

    /// Finalize: pointer table, duration table, frame count, guard. Flushes
    /// and hands the inner writer back.
    pub fn finish(mut self) -> Result<W, ConvertError> {
        let count = self.frame_count;
        let symbol = &self.symbol;

        writeln!(self.writer, "// Frame pointers")?;
        write!(self.writer, "const u16* const {symbol}_frames[{count}] = {{")?;
        write_list(
            &mut self.writer,
            (0..count).map(|i| format!("{symbol}_frame{i}")),
            POINTERS_PER_LINE,
        )?;

        writeln!(self.writer, "// Frame durations (in frames at {REFRESH_RATE}fps)")?;
        writeln!(
            self.writer,
            "// Fixed duration of {} frames for {}fps input",
            self.duration, self.fps
        )?;
        write!(self.writer, "const u16 {symbol}_durations[{count}] = {{")?;
        write_list(
            &mut self.writer,
            std::iter::repeat(self.duration).take(count),
            DURATIONS_PER_LINE,
        )?;

        writeln!(self.writer, "// Animation info")?;
        writeln!(self.writer, "const u16 {symbol}_frame_count = {count};")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "#endif // {}", self.guard)?;

        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Body of a brace-initialised array, starting right after the `{`.
///
/// Every item but the last is followed by `", "`, and a line break plus
/// indent goes after every `per_line`-th item, including the last one.
fn write_list<W, I, T>(writer: &mut W, items: I, per_line: usize) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = T>,
    T: Display,
{
    write!(writer, "\n    ")?;
    let mut items = items.enumerate().peekable();
    while let Some((i, item)) = items.next() {
        write!(writer, "{item}")?;
        if items.peek().is_some() {
            write!(writer, ", ")?;
        }
        if (i + 1) % per_line == 0 {
            write!(writer, "\n    ")?;
        }
    }
    write!(writer, "\n}};\n\n")
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn render(frames: &[Vec<u16>], symbol: &str, fps: u32) -> String {
        let mut writer = HeaderWriter::new(Cursor::new(Vec::new()), symbol, "clip.gif", fps).unwrap();
        for frame in frames {
            writer.write_frame(frame).unwrap();
        }
        let buf = writer.finish().unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    fn array_body<'a>(text: &'a str, decl: &str) -> &'a str {
        let start = text.find(decl).unwrap() + decl.len();
        let end = start + text[start..].find("};").unwrap();
        &text[start..end]
    }

    #[test]
    fn preamble_and_guard() {
        let text = render(&[vec![0; FRAME_PIXELS]], "intro", 20);
        assert!(text.starts_with(
            "// Auto-generated GIF to GBA conversion\n\
             // Original file: clip.gif\n\
             // Input framerate: 20 fps\n\
             \n\
             #ifndef INTRO_H\n\
             #define INTRO_H\n\
             \n\
             #include <gba_types.h>\n\
             \n\
             // Frame 0\n\
             const u16 intro_frame0[38400] = {\n    0x0000, "
        ));
        assert!(text.ends_with(
            "// Animation info\n\
             const u16 intro_frame_count = 1;\n\
             \n\
             #endif // INTRO_H\n"
        ));
    }

    #[test]
    fn frame_array_layout() {
        let mut frame = vec![0u16; FRAME_PIXELS];
        frame[0] = 0x7FFF;
        frame[11] = 0x001F;
        frame[12] = 0x03e0;
        let text = render(&[frame], "a", 20);
        let body = array_body(&text, "const u16 a_frame0[38400] = {");

        let lines: Vec<&str> = body.split('\n').collect();
        // leading break, 3200 full rows, trailing indent after the last row
        assert_eq!(lines.len(), 1 + FRAME_PIXELS / PIXELS_PER_LINE + 1);
        assert_eq!(lines[0], "");
        assert_eq!(
            lines[1],
            "    0x7FFF, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, \
             0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x001F, "
        );
        assert!(lines[2].starts_with("    0x03E0, 0x0000"));
        assert_eq!(lines[3200], "    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000");
        assert_eq!(lines[3201], "    ");

        let values = body.split(',').count();
        assert_eq!(values, FRAME_PIXELS);
    }

    #[test]
    fn pointer_and_duration_tables() {
        let frames = vec![vec![0u16; FRAME_PIXELS]; 7];
        let text = render(&frames, "walk", 30);

        assert!(text.contains(
            "// Frame pointers\n\
             const u16* const walk_frames[7] = {\n    \
             walk_frame0, walk_frame1, walk_frame2, walk_frame3, walk_frame4, \n    \
             walk_frame5, walk_frame6\n\
             };\n\n"
        ));
        assert!(text.contains(
            "// Frame durations (in frames at 60fps)\n\
             // Fixed duration of 2 frames for 30fps input\n\
             const u16 walk_durations[7] = {\n    \
             2, 2, 2, 2, 2, 2, 2\n\
             };\n\n"
        ));
        assert!(text.contains("const u16 walk_frame_count = 7;\n"));
    }

    #[test]
    fn exact_multiple_wraps_after_last_item() {
        let frames = vec![vec![0u16; FRAME_PIXELS]; 10];
        let text = render(&frames, "x", 60);
        assert!(text.contains(
            "const u16 x_durations[10] = {\n    \
             1, 1, 1, 1, 1, 1, 1, 1, 1, 1\n    \n\
             };\n\n"
        ));
        assert!(text.contains("x_frame4, \n    x_frame5,"));
        assert!(text.contains("x_frame9\n    \n};\n\n"));
    }

    #[test]
    fn tracks_frames_and_duration() {
        let mut writer = HeaderWriter::new(Vec::new(), "a", "a.gif", 20).unwrap();
        assert_eq!(writer.duration(), 3);
        writer.write_frame(&vec![0; FRAME_PIXELS]).unwrap();
        writer.write_frame(&vec![0; FRAME_PIXELS]).unwrap();
        assert_eq!(writer.frame_count(), 2);
    }

    #[test]
    fn rejects_wrong_frame_size() {
        let mut writer = HeaderWriter::new(Vec::new(), "a", "a.gif", 20).unwrap();
        let err = writer.write_frame(&[0u16; 100]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::FrameSize { expected: FRAME_PIXELS, actual: 100 }
        ));
        assert_eq!(err.to_string(), "frame has 100 pixels, expected 38400");
        assert_eq!(writer.frame_count(), 0);
    }

    #[test]
    fn rejects_bad_symbols_and_rates() {
        for name in ["", "1st", "my-anim", "a b", "é"] {
            let err = HeaderWriter::new(Vec::new(), name, "a.gif", 20).err().unwrap();
            assert!(matches!(err, ConvertError::InvalidSymbol(_)), "{name}");
        }
        let err = HeaderWriter::new(Vec::new(), "ok", "a.gif", 0).err().unwrap();
        assert!(matches!(err, ConvertError::InvalidFrameRate(0)));
    }

    #[test]
    fn identifiers() {
        assert!(is_c_identifier("animation"));
        assert!(is_c_identifier("_private2"));
        assert!(is_c_identifier("Walk_Cycle"));
        assert!(!is_c_identifier("2fast"));
        assert!(!is_c_identifier("dash-name"));
    }

    #[test]
    fn surfaces_write_failures() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = HeaderWriter::new(Broken, "a", "a.gif", 20).err().unwrap();
        match err {
            ConvertError::Write(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other}"),
        }
    }
}
