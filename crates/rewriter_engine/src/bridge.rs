use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// Instruction delivered to the page-insertion environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageInstruction {
    ReplaceText { text: String },
}

/// Writes newline-delimited JSON instructions for the page side to consume.
pub struct PageBridge<W: Write> {
    out: W,
}

impl<W: Write> PageBridge<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn send(&mut self, instruction: &PageInstruction) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, instruction)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::{PageBridge, PageInstruction};

    #[test]
    fn replace_text_uses_the_action_wire_format() {
        let mut buffer = Vec::new();
        let mut bridge = PageBridge::new(&mut buffer);
        bridge
            .send(&PageInstruction::ReplaceText {
                text: "Hello".to_string(),
            })
            .unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "{\"action\":\"replaceText\",\"text\":\"Hello\"}\n"
        );
    }

    #[test]
    fn instructions_round_trip() {
        let instruction = PageInstruction::ReplaceText {
            text: "x".to_string(),
        };
        let json = serde_json::to_string(&instruction).unwrap();
        let parsed: PageInstruction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, instruction);
    }
}
