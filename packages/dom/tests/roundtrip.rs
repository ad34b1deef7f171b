//! Reading and writing markup must be stable: once a page has been read,
//! writing it out and reading it back produces the same text.

use livepage_dom::{parse, to_markup};

fn assert_stable(source: &str) {
    let first = to_markup(&parse(source).unwrap());
    let second = to_markup(&parse(&first).unwrap());
    assert_eq!(first, second, "markup changed on re-read:\n{}", source);
}

#[test]
fn test_starter_page_is_stable() {
    assert_stable(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>My Page</title>
  <link rel="stylesheet" href="style.css">
</head>
<body>
  <h1 class="title">Welcome</h1>
  <p>Edit me &amp; enjoy.</p>
  <script src="script.js"></script>
</body>
</html>
"#,
    );
}

#[test]
fn test_sloppy_markup_is_stable() {
    assert_stable("<title>t</title><p>one<p>two<ul><li>a<li>b</ul></span>tail");
    assert_stable("<!-- lead --><body onload=\"go('x')\"><img src=a.png alt='say \"hi\"'></body><p>after</p>");
    assert_stable("<?xml version=\"1.0\"?><html><body><style>p > a { color: red }</style></body></html>");
}

#[test]
fn test_doctype_and_attributes_survive() {
    let source = r#"<!DOCTYPE html><html class="no-js" data-theme="dark"><head></head><body id="page" class="home"><input disabled value=""></body></html>"#;
    let markup = to_markup(&parse(source).unwrap());

    assert_eq!(
        markup,
        "<!DOCTYPE html>\n<html class=\"no-js\" data-theme=\"dark\"><head></head><body id=\"page\" class=\"home\"><input disabled=\"\" value=\"\"></body></html>"
    );
}

#[test]
fn test_quotes_in_attributes_are_escaped_once() {
    let doc = parse(r#"<body><a title='say "hi"'>x</a></body>"#).unwrap();
    let markup = to_markup(&doc);
    assert!(markup.contains(r#"title="say &quot;hi&quot;""#));

    // &quot; is kept raw on re-read, so the text does not grow
    let again = to_markup(&parse(&markup).unwrap());
    assert_eq!(markup, again);
}
