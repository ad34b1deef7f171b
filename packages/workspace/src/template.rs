//! Starter files written by [`ProjectStore::create`](crate::ProjectStore::create).

const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>{title}</title>{css}
</head>
<body>
<header class="site-header">
<div class="container">
<h1 class="site-title">Website Name</h1>
<nav class="main-nav">
<a href="#">Home</a>
<a href="#about">About</a>
<a href="#contact">Contact</a>
</nav>
</div>
</header>

<main class="site-main container">
<section class="hero">
<h2>Welcome!</h2>
<p>This is a simple default template. You can start building your pages and editing styles from here.</p>
<a class="btn" href="#about">Get Started</a>
</section>

<section id="about" class="content-card">
<h3>About this project</h3>
<p>Write your content here. You can add new HTML elements or change the styles in the CSS file.</p>
</section>

<section id="contact" class="content-card">
<h3>Contact</h3>
<p>Email: <a href="mailto:info@example.com">info@example.com</a></p>
</section>
</main>

<footer class="site-footer">
<div class="container">
<p>&copy; 2025 All rights reserved.</p>
</div>
</footer>{js}
</body>
</html>
"##;

pub const STARTER_STYLESHEET: &str = r#"/* Short modern stylesheet for the starter template */
:root{
  --bg: #fbfdff;
  --card: #ffffff;
  --muted: #6b7280;
  --accent: #2563eb;
  --accent-2: #7c3aed;
  --radius: 10px;
  --gap: 16px;
  --container-w: 1100px;
}

*{box-sizing:border-box}
html,body{margin:0;padding:0;font-family:Inter,ui-sans-serif,system-ui,-apple-system,Segoe UI,Roboto,Arial;color:#0f172a;background:var(--bg);line-height:1.45}
a{color:inherit;text-decoration:none}

/* layout */
.container{max-width:var(--container-w);margin:0 auto;padding:20px}
.site-header{background:linear-gradient(90deg,var(--card),#f8fbff);border-bottom:1px solid #e6eefc}
.site-header .container{display:flex;align-items:center;justify-content:space-between;gap:var(--gap)}
.site-title{font-size:1.1rem;font-weight:700}
.main-nav a{margin-left:14px;color:var(--muted);font-weight:600}
.main-nav a:hover{color:var(--accent)}

/* hero */
.hero{display:flex;flex-direction:column;gap:12px;align-items:flex-start;padding:48px;border-radius:var(--radius);background:linear-gradient(180deg,rgba(37,99,235,0.06),transparent)}
.hero h2{margin:0;font-size:1.6rem}
.hero p{margin:0;color:var(--muted)}
.btn{display:inline-block;margin-top:6px;padding:10px 14px;border-radius:8px;background:linear-gradient(90deg,var(--accent),var(--accent-2));color:#fff;font-weight:600;box-shadow:0 6px 18px rgba(37,99,235,0.12)}

/* cards / sections */
.content-card{background:var(--card);padding:18px;border-radius:12px;box-shadow:0 6px 18px rgba(2,6,23,0.04);margin-top:18px}
.content-card h3{margin:0 0 8px 0}
.content-card p{margin:0;color:var(--muted)}

/* footer */
.site-footer{margin-top:28px;padding:18px 0;color:var(--muted);font-size:0.9rem;text-align:center}

/* responsive */
@media (min-width:880px){
  .hero{flex-direction:row;justify-content:space-between;align-items:center}
  .hero h2{font-size:2rem}
}
@media (max-width:520px){
  .main-nav a{margin-left:10px;font-size:0.95rem}
  .container{padding:14px}
}
"#;

/// Starter `index.html`. The stylesheet link and script tag are only
/// present when the matching file is created alongside it.
pub fn starter_index(title: &str, with_css: bool, with_js: bool) -> String {
    let css = if with_css {
        "\n  <link rel=\"stylesheet\" href=\"style.css\">"
    } else {
        ""
    };
    let js = if with_js {
        "\n<script src=\"script.js\"></script>"
    } else {
        ""
    };
    INDEX_TEMPLATE
        .replace("{title}", title)
        .replace("{css}", css)
        .replace("{js}", js)
}

pub fn starter_script(project: &str) -> String {
    format!("console.log('Project {} script loaded');\n", project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_index_links_optional_files() {
        let bare = starter_index("site", false, false);
        assert!(bare.contains("<title>site</title>"));
        assert!(!bare.contains("style.css"));
        assert!(!bare.contains("script.js"));

        let full = starter_index("site", true, true);
        assert!(full.contains("<link rel=\"stylesheet\" href=\"style.css\">"));
        assert!(full.contains("<script src=\"script.js\"></script>\n</body>"));
    }

    #[test]
    fn test_starter_index_parses() {
        let doc = livepage_dom::parse(&starter_index("site", true, true)).unwrap();
        assert!(doc.get_element_by_id("about").is_some());
        assert!(doc.get_element_by_id("contact").is_some());
    }
}
