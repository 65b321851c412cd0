use std::io::{self, Write};

use serde_json::Value;

use super::config::{OutputConfig, OutputFormat};
use super::types::Envelope;

pub trait Presenter: Send + Sync {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()>;
}

pub struct JsonPresenter { pub pretty: bool }
impl Presenter for JsonPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        if self.pretty { serde_json::to_writer_pretty(&mut *w, env).map_err(to_io)? } else { serde_json::to_writer(&mut *w, env).map_err(to_io)? }
        writeln!(w)
    }
}

/// One line per record; `pretty` indents each record instead.
pub struct TextPresenter { pub pretty: bool }
impl Presenter for TextPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Result: {}", env.op)?;
        let rows: Vec<&Value> = match &env.result {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other],
        };
        if rows.is_empty() {
            return writeln!(w, "  (empty)");
        }
        for row in rows {
            write!(w, "  ")?;
            if self.pretty { serde_json::to_writer_pretty(&mut *w, row).map_err(to_io)?; } else { serde_json::to_writer(&mut *w, row).map_err(to_io)?; }
            writeln!(w)?;
        }
        Ok(())
    }
}

pub struct Emitter {
    presenter: Box<dyn Presenter>,
}

impl Emitter {
    pub fn from_env(cfg: OutputConfig) -> Self {
        let json = cfg.format == OutputFormat::Json || crate::telemetry::config::json_mode();
        let presenter: Box<dyn Presenter> = if json {
            Box::new(JsonPresenter { pretty: cfg.pretty })
        } else {
            Box::new(TextPresenter { pretty: cfg.pretty })
        };
        Emitter { presenter }
    }

    pub fn emit(&self, env: &Envelope) -> io::Result<()> {
        let mut out = io::stdout();
        self.presenter.emit(env, &mut out)?;
        out.flush()
    }
}

fn to_io(e: serde_json::Error) -> io::Error { io::Error::new(io::ErrorKind::Other, e) }

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(p: &dyn Presenter, env: &Envelope) -> String {
        let mut buf = Vec::new();
        p.emit(env, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_lists_each_record() {
        let env = Envelope::result("search", &json!([{"title": "A"}, {"title": "B"}]), None).unwrap();
        let out = render(&TextPresenter { pretty: false }, &env);
        assert_eq!(out, "Result: search\n  {\"title\":\"A\"}\n  {\"title\":\"B\"}\n");
    }

    #[test]
    fn text_marks_absent_results() {
        let env = Envelope::result("stream", &Option::<String>::None, None).unwrap();
        let out = render(&TextPresenter { pretty: false }, &env);
        assert_eq!(out, "Result: stream\n  (empty)\n");
    }

    #[test]
    fn json_is_single_line_envelope() {
        let env = Envelope::result("details", &json!({"synopsis": "x"}), None).unwrap();
        let out = render(&JsonPresenter { pretty: false }, &env);
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("\"op\":\"details\""));
    }
}
