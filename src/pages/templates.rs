//! Compiled-in page templates.
//!
//! Placeholders are `{{name}}`. Every value is escaped before substitution
//! except the `*_block` placeholders, which receive already-rendered markup.

pub const STYLE: &str = r#"<link rel="stylesheet" href="/__voidStatic/void.css">"#;

pub const MAINTENANCE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{service_name}} is down for maintenance</title>
  {{style_block}}
</head>
<body>
  <main class="card">
    <h1>{{service_name}} is currently unavailable</h1>
    <p>We are performing maintenance on <code>{{hostname}}</code>. Please check back soon.</p>
    <ul class="links">
      <li><a href="{{status}}">Status page</a></li>
      <li><a href="{{support}}">Support</a></li>
    </ul>
    {{redirect_block}}
    <footer>
      <span>Path: <code>{{path}}</code></span>
      <span>void {{version}} ({{commit}})</span>
    </footer>
  </main>
</body>
</html>
"##;

pub const ERROR_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{status_code}} {{title}}</title>
  {{style_block}}
</head>
<body>
  <main class="card error">
    <h1>{{status_code}} {{title}}</h1>
    <p>{{message}}</p>
    <ul class="links">
      <li><a href="{{status}}">{{service_name}} status page</a></li>
      <li><a href="{{support}}">Support</a></li>
    </ul>
    {{redirect_block}}
    <details>
      <summary>{{summary}}</summary>
      <pre>{{details}}</pre>
      <pre>{{trace}}</pre>
      <p>Host: <code>{{hostname}}</code> Path: <code>{{path}}</code> Time: {{time}}</p>
    </details>
    <footer>
      <span>void {{version}} ({{commit}})</span>
    </footer>
  </main>
</body>
</html>
"##;

pub const REDIRECT_BLOCK: &str =
    r#"<p class="redirect">You were sent here from <a href="{{redirect}}">{{redirect}}</a>.</p>"#;
