//! Built-in sample page, used by `--sample` and as the fallback document
//! when a caller cannot obtain real markup.

/// URL reported alongside [`SAMPLE_DOCUMENT`]
pub const SAMPLE_URL: &str = "https://example.com/guides/static-site-seo";

/// A reasonably complete page exercising every category
pub const SAMPLE_DOCUMENT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Static Site SEO Guide: Practical Checklist for Fast Pages</title>
  <meta name="description" content="A practical checklist for static site SEO covering titles, headings, images, links and structured data, with examples you can copy into your own pages today.">
  <meta name="robots" content="index, follow">
  <link rel="canonical" href="https://example.com/guides/static-site-seo">
  <link rel="icon" href="/favicon.ico">
  <meta property="og:title" content="Static Site SEO Guide">
  <meta property="og:description" content="A practical checklist for static site SEO.">
  <meta property="og:image" content="https://example.com/img/cover.png">
  <meta property="og:url" content="https://example.com/guides/static-site-seo">
  <meta property="og:type" content="article">
  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:title" content="Static Site SEO Guide">
  <meta name="twitter:description" content="A practical checklist for static site SEO.">
  <meta name="twitter:image" content="https://example.com/img/cover.png">
  <link rel="stylesheet" href="/css/site.css">
  <script type="application/ld+json">{"@context":"https://schema.org","@type":"Article","headline":"Static Site SEO Guide"}</script>
  <style>@media (max-width: 600px) { body { font-size: 16px; } }</style>
</head>
<body>
  <header>
    <nav><a href="/">Home</a> <a href="/guides/">Guides</a> <a href="/about">About</a></nav>
  </header>
  <main>
    <h1>Static Site SEO Guide</h1>
    <p>Search engines reward pages that load quickly, describe themselves clearly and link to related material. This guide walks through the checks that matter most for hand written and generated static pages, in the order you are likely to meet them while publishing a new article.</p>
    <h2>Write a descriptive title</h2>
    <p>The title element is the first thing a reader sees in search results. Keep it between thirty and sixty characters, put the main topic near the start, and avoid repeating the site name on every page when space is tight. A good title promises exactly what the page delivers.</p>
    <h3>Pair it with a meta description</h3>
    <p>The description does not change ranking directly, yet it shapes the snippet shown under the title. Aim for one hundred twenty to one hundred sixty characters that summarise the page and invite a click without exaggeration.</p>
    <h2>Structure headings carefully</h2>
    <p>Use a single top level heading that names the page, then break the body into sections with second level headings. Nested subsections use third level headings. Skipping levels makes the outline harder to follow for assistive technology and for crawlers building a summary of the document.</p>
    <ul>
      <li>One top level heading per page</li>
      <li>Second level headings for major sections</li>
      <li>Third level headings for nested detail</li>
    </ul>
    <img src="/img/outline.png" alt="Outline of a well structured article" width="800" height="450" loading="lazy">
    <h2>Describe every image</h2>
    <p>Alternative text explains an image to people who cannot see it and to search engines indexing image results. Decorative images may use an empty alternative, while meaningful images deserve a <strong>short, specific</strong> description. Declaring width and height prevents layout shift as images arrive.</p>
    <img src="/img/alt-text.png" alt="Examples of helpful alternative text" width="800" height="450" loading="lazy">
    <h2>Link with intent</h2>
    <p>Internal links help visitors discover related guides and help crawlers understand how pages relate. External links to trustworthy references add credibility. Read the <a href="/guides/structured-data">structured data guide</a> next, or consult the <a href="https://developers.google.com/search/docs" rel="noopener">official search documentation</a> for more detail.</p>
    <h2>Keep pages light</h2>
    <p>Every kilobyte costs time on slow connections. Prefer a small number of external stylesheets, defer scripts that are not needed for the first paint, and compress text assets on the server. Measure regularly, because pages grow quietly as features accumulate over months of edits.</p>
    <p>Finally, serve everything over a secure connection, keep a consistent canonical address for each page, and check your work on a narrow screen before you publish. These habits compound, and a site that follows them steadily earns the trust of readers and search engines alike.</p>
  </main>
  <footer><p>Published by the Example documentation team. See the <a href="/guides/">guide index</a>.</p></footer>
  <script src="/js/site.js" defer></script>
</body>
</html>
"#;
