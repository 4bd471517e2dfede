use crate::i18n::Language;
use crate::models::DOWNLOAD_FILE_NAME;
use base64::{engine::general_purpose::STANDARD, Engine as _};

const BUSY_LABEL: &str = "Generating image...";
const IMAGE_CAPTION: &str = "Generated coloring image";
pub const RETRY_HINT: &str = "Failed to generate image. Please try again.";

const STYLE: &str = r#"
body {
    margin: 0;
    min-height: 100vh;
    font-family: "Source Sans Pro", sans-serif;
    background-image: linear-gradient(to right top, #ff9a9e, #fad0c4, #ffecd2);
    color: #333333;
}
main { max-width: 720px; margin: 0 auto; padding: 2rem 1rem; }
h1 { color: #333333; text-align: center; }
label { color: #666666; display: block; margin-bottom: .5rem; }
input[type=text] {
    width: 100%;
    box-sizing: border-box;
    padding: .5rem;
    background-color: rgba(255, 255, 255, 0.8);
    color: #333333;
    border: 1px solid #cccccc;
    border-radius: 4px;
}
button, .download {
    margin-top: 1rem;
    padding: .5rem 1rem;
    background-color: #4CAF50;
    color: white;
    font-weight: bold;
    border: none;
    border-radius: 4px;
    text-decoration: none;
    display: inline-block;
    cursor: pointer;
}
button:disabled { opacity: .6; cursor: wait; }
.language-selector { display: flex; justify-content: center; margin-bottom: 20px; }
.language-selector select { width: 150px; padding: 2px 10px; }
.notice { margin-top: 1rem; padding: .75rem 1rem; border-radius: 4px; }
.notice.warning { background: #fff3cd; color: #7a5b00; }
.notice.error { background: #f8d7da; color: #7a1c24; }
figure { margin: 1.5rem 0 0; text-align: center; }
figure img { max-width: 100%; background: white; }
figcaption { color: #666666; font-size: .9rem; }
"#;

const BUSY_SCRIPT: &str = r#"
document.getElementById("generate-form").addEventListener("submit", function () {
    var button = document.getElementById("generate-button");
    button.disabled = true;
    button.textContent = button.dataset.busy;
});
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

pub struct PageView<'a> {
    pub language: Language,
    pub description: &'a str,
    pub notice: Option<Notice>,
    pub image_png: Option<&'a [u8]>,
}

pub fn render(view: &PageView<'_>) -> String {
    let t = view.language.translations();
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"{}\">\n<head>\n", view.language.code()));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Kids' Coloring Image Generator</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n<main>\n", STYLE));

    html.push_str("<form class=\"language-selector\" method=\"get\" action=\"/\">\n");
    html.push_str(&format!(
        "<select name=\"lang\" aria-label=\"{}\" onchange=\"this.form.submit()\">\n",
        escape(t.language)
    ));
    for lang in Language::ALL {
        let selected = if lang == view.language { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            lang.code(),
            selected,
            lang.display_name()
        ));
    }
    html.push_str("</select>\n<noscript><button type=\"submit\">OK</button></noscript>\n</form>\n");

    html.push_str(&format!("<h1>{}</h1>\n", escape(t.title)));

    html.push_str("<form id=\"generate-form\" method=\"post\" action=\"/generate\">\n");
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"lang\" value=\"{}\">\n",
        view.language.code()
    ));
    html.push_str(&format!(
        "<label for=\"description\">{}</label>\n",
        escape(t.input_prompt)
    ));
    html.push_str(&format!(
        "<input type=\"text\" id=\"description\" name=\"description\" value=\"{}\">\n",
        escape(view.description)
    ));
    html.push_str(&format!(
        "<button type=\"submit\" id=\"generate-button\" data-busy=\"{}\">{}</button>\n</form>\n",
        BUSY_LABEL,
        escape(t.generate_button)
    ));

    match &view.notice {
        Some(Notice::Warning(msg)) => html.push_str(&format!(
            "<div class=\"notice warning\">{}</div>\n",
            escape(msg)
        )),
        Some(Notice::Error(msg)) => html.push_str(&format!(
            "<div class=\"notice error\">{}</div>\n",
            escape(msg)
        )),
        None => {}
    }

    if let Some(png) = view.image_png {
        html.push_str(&format!(
            "<figure>\n<img src=\"data:image/png;base64,{}\" alt=\"{}\">\n<figcaption>{}</figcaption>\n</figure>\n",
            STANDARD.encode(png),
            IMAGE_CAPTION,
            IMAGE_CAPTION
        ));
        html.push_str(&format!(
            "<a class=\"download\" href=\"/download\" download=\"{}\">{}</a>\n",
            DOWNLOAD_FILE_NAME,
            escape(t.download_button)
        ));
    }

    html.push_str("<section class=\"instructions\">\n<p><strong>Instructions:</strong></p>\n<ol>\n");
    let (steps, outro) = t.instructions.split_at(t.instructions.len().saturating_sub(1));
    for step in steps {
        html.push_str(&format!("<li>{}</li>\n", escape(step)));
    }
    html.push_str("</ol>\n");
    for line in outro {
        html.push_str(&format!("<p>{}</p>\n", escape(line)));
    }
    html.push_str("</section>\n");

    html.push_str(&format!("</main>\n<script>{}</script>\n</body>\n</html>\n", BUSY_SCRIPT));
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
