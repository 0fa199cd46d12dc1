//! Assembly of the single page the shell serves: a title header, the text
//! box with an example default, the status label, and a hidden audio player.

/// Default contents of the text box.
pub const EXAMPLE_TEXT: &str =
    "Text to speech systems turn written sentences into natural sounding audio. \
     Type any text into the box and submit it to hear the generated voice.";

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 720px;
            margin: 40px auto;
            padding: 0 16px;
            color: #222;
        }
        h1 { font-weight: 600; }
        textarea {
            width: 100%;
            box-sizing: border-box;
            padding: 8px;
            font: inherit;
        }
        button {
            margin-top: 8px;
            padding: 8px 20px;
            font: inherit;
            cursor: pointer;
        }
        #status { color: #555; }
        audio { width: 100%; margin-top: 8px; }
    </style>
</head>
<body>
    <h1>{title}</h1>
    <form id="tts-form">
        <label for="text">Text to convert:</label><br>
        <textarea id="text" name="text" rows="4">{example_text}</textarea><br>
        <button type="submit">Submit</button>
    </form>
    <p id="status">{status}</p>
    <section id="player" hidden>
        <h2>Audio generated:</h2>
        <audio id="audio" controls></audio>
    </section>
    <script>
        const statusLabel = document.getElementById('status');

        const poll = setInterval(async () => {
            const res = await fetch('/status');
            const data = await res.json();
            statusLabel.textContent = data.message;
            if (data.initialized) {
                clearInterval(poll);
            }
        }, 500);

        document.getElementById('tts-form').addEventListener('submit', async (event) => {
            event.preventDefault();
            const text = document.getElementById('text').value;
            const res = await fetch('/synthesize', {
                method: 'POST',
                headers: {'Content-Type': 'application/x-www-form-urlencoded'},
                body: 'text=' + encodeURIComponent(text),
            });
            const data = await res.json();
            if (!res.ok) {
                alert(data.error);
                return;
            }
            if (data.message) {
                statusLabel.textContent = data.message;
                return;
            }
            const audio = document.getElementById('audio');
            audio.src = data.audio_url;
            document.getElementById('player').hidden = false;
            audio.play();
        });
    </script>
</body>
</html>"#;

/// Render the index page.
pub fn render_index(title: &str, example_text: &str, status: &str) -> String {
    INDEX_TEMPLATE
        .replace("{title}", &html_escape(title))
        .replace("{example_text}", &html_escape(example_text))
        .replace("{status}", &html_escape(status))
}

/// Basic HTML escaping for text interpolated into the page.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_carries_title_default_text_and_status() {
        let page = render_index("Elevenlabs Text-to-Speech demo", EXAMPLE_TEXT, "Initializing model...");
        assert!(page.contains("<h1>Elevenlabs Text-to-Speech demo</h1>"));
        assert!(page.contains("Type any text into the box"));
        assert!(page.contains("Initializing model..."));
        assert!(page.contains("id=\"audio\""));
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let page = render_index("<script>", "a & b", "ok");
        assert!(page.contains("<h1>&lt;script&gt;</h1>"));
        assert!(page.contains(">a &amp; b</textarea>"));
    }

    #[test]
    fn escape_covers_the_special_characters() {
        assert_eq!(html_escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
