//! In-page JavaScript evaluated over the backend's `evaluate` channel.
//!
//! All page-side audit state lives under the `window.__a11y` namespace so
//! nothing collides with the page's own globals. The namespace is created
//! fresh by [`PAGE_SETUP`] for each audit and is scoped to that page
//! instance only.

/// Query-string parameter carrying the ruleset identifier into the page.
pub const STANDARD_PARAM: &str = "__a11y_standard";

/// Creates the audit namespace and parses the page's own query string into
/// `__a11y.vars`. The query string is the only channel for passing the
/// standard identifier across the navigation boundary.
pub const PAGE_SETUP: &str = r#"
(() => {
    window.__a11y = { isComplete: false };
    const params = {};
    location.search.replace(/^\?/, '').split('&').forEach((pair) => {
        if (!pair) {
            return;
        }
        const parts = pair.split('=');
        params[decodeURIComponent(parts.shift())] = decodeURIComponent(parts.join('='));
    });
    window.__a11y.vars = params;
    return true;
})()
"#;

/// Appends a script tag pulling HTML_CodeSniffer into the page.
pub const INJECT_SNIFFER: &str = r#"
(() => {
    const script = document.createElement('script');
    script.src = 'https://squizlabs.github.io/HTML_CodeSniffer/build/HTMLCS.js';
    document.head.appendChild(script);
    return true;
})()
"#;

/// True once the sniffer's global entry point exists.
pub const SNIFFER_READY: &str = "typeof window.HTMLCS !== 'undefined'";

/// Starts the sniffer against the document, flagging the namespace when its
/// completion callback fires.
pub const RUN_SNIFFER: &str = r#"
(() => {
    window.HTMLCS.process(window.__a11y.vars.__a11y_standard, window.document, () => {
        window.__a11y.isComplete = true;
    });
    return true;
})()
"#;

/// True once the sniffer has signaled completion.
pub const SNIFF_COMPLETE: &str = "window.__a11y.isComplete === true";

/// Reads the accumulated findings back out, flattening each DOM reference
/// into a markup snippet and a structural selector so the records survive
/// serialization out of the page.
pub const COLLECT_MESSAGES: &str = r#"
(() => {
    const selectorFor = (element) => {
        const parts = [];
        let node = element;
        while (node && node.nodeType === 1) {
            let part = node.nodeName.toLowerCase();
            if (node.id) {
                parts.unshift(part + '#' + node.id);
                break;
            }
            const parent = node.parentNode;
            if (parent && parent.children) {
                const sameTag = Array.prototype.filter.call(parent.children, (child) => {
                    return child.nodeName === node.nodeName;
                });
                if (sameTag.length > 1) {
                    part += ':nth-child(' + (Array.prototype.indexOf.call(parent.children, node) + 1) + ')';
                }
            }
            parts.unshift(part);
            node = parent;
        }
        return parts.join(' > ');
    };
    return window.HTMLCS.getMessages().map((record) => ({
        type: record.type,
        code: record.code,
        message: record.msg,
        context: record.element && record.element.outerHTML
            ? record.element.outerHTML.substring(0, 200)
            : null,
        selector: record.element ? selectorFor(record.element) : null
    }));
})()
"#;
