//! Embedded fallback stylesheet, used when no external CSS is supplied.

pub const DEFAULT_CSS: &str = r#"
body {
    font-family: Georgia, 'Times New Roman', serif;
    max-width: 52rem;
    margin: 0 auto;
    padding: 2rem 1.5rem;
    color: #2b2b2b;
    line-height: 1.6;
    background: #fdfbf7;
}
h1 {
    color: #5d3a1a;
    border-bottom: 2px solid #c9a96a;
    padding-bottom: 0.3rem;
    page-break-before: always;
}
h1:first-of-type {
    page-break-before: avoid;
}
h2 {
    color: #6b4423;
    border-bottom: 1px solid #e0d3b8;
    margin-top: 2rem;
}
h3, h4, h5, h6 {
    color: #7a5230;
}
.hierarchy-level-3 { margin-left: 1rem; }
.hierarchy-level-4 { margin-left: 2rem; }
.hierarchy-level-5 { margin-left: 3rem; }
.hierarchy-level-6 { margin-left: 4rem; }
a {
    color: #8b5e2b;
    text-decoration: none;
}
a:hover {
    text-decoration: underline;
}
hr {
    border: none;
    border-top: 1px solid #d8c9a7;
    margin: 2rem 0;
}
blockquote {
    border-left: 3px solid #c9a96a;
    margin-left: 0;
    padding-left: 1rem;
    color: #5a5046;
}
em {
    color: #6e6257;
}
@media print {
    body { background: #fff; }
    a { color: inherit; }
}
"#;
