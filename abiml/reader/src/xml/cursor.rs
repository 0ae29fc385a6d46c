use super::err::{Result, XmlError};
use super::lexer::{Lexer, Tok, unescape};

/// One element-start event: tag name, attributes in document order, the
/// absolute nesting depth of the element, and whether it self-closes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Elem {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub depth: usize,
    pub empty: bool,
}

impl Elem {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// A fully materialized element subtree, produced by [`Cursor::expand`].
/// Child depths are absolute, consistent with the streaming events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElemNode {
    pub elem: Elem,
    pub children: Vec<ElemNode>,
}

impl ElemNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.elem.attr(name)
    }
}

/// A pull cursor over one document. `advance` moves to the next
/// element-start event, silently consuming closing tags in between;
/// `expand` materializes the current element's whole subtree and leaves the
/// cursor just past it.
pub struct Cursor<'source> {
    toks: Lexer<'source>,
    /// Names of the elements the cursor is currently inside of.
    open: Vec<String>,
    cur: Option<Elem>,
}

impl<'source> Cursor<'source> {
    pub fn new(source: &'source str) -> Self {
        Self { toks: Lexer::new(source), open: Vec::new(), cur: None }
    }

    /// The element the cursor is positioned on, if any.
    pub fn cur(&self) -> Option<&Elem> {
        self.cur.as_ref()
    }

    /// Move to the next element-start event; `Ok(None)` at a well-formed
    /// end of stream.
    pub fn advance(&mut self) -> Result<Option<&Elem>> {
        // entering the previous element, if it can have children
        if let Some(cur) = self.cur.take() {
            if !cur.empty {
                self.open.push(cur.name);
            }
        }
        loop {
            match self.next_tok()? {
                | None => {
                    if !self.open.is_empty() {
                        return Err(XmlError::UnexpectedEof);
                    }
                    return Ok(None);
                }
                | Some((_, Tok::Open, _)) => {
                    let depth = self.open.len();
                    let elem = self.element_start(depth)?;
                    self.cur = Some(elem);
                    return Ok(self.cur.as_ref());
                }
                | Some((at, Tok::OpenSlash, _)) => {
                    let name = self.close_name()?;
                    match self.open.pop() {
                        | Some(expected) if expected == name => continue,
                        | Some(expected) => {
                            return Err(XmlError::MismatchedClose { expected, found: name });
                        }
                        | None => {
                            return Err(XmlError::Unexpected {
                                found: format!("</{}>", name),
                                at,
                            });
                        }
                    }
                }
                | Some((at, tok, _)) => {
                    return Err(XmlError::Unexpected { found: tok.to_string(), at });
                }
            }
        }
    }

    /// Materialize the subtree rooted at the current element, consuming it.
    /// Afterwards the cursor has no current element and the next `advance`
    /// yields the following sibling.
    pub fn expand(&mut self) -> Result<ElemNode> {
        let Some(root) = self.cur.take() else {
            return Err(XmlError::NoElement);
        };
        if root.empty {
            return Ok(ElemNode { elem: root, children: Vec::new() });
        }
        let base = root.depth;
        let mut stack = vec![ElemNode { elem: root, children: Vec::new() }];
        loop {
            match self.next_tok()? {
                | None => return Err(XmlError::UnexpectedEof),
                | Some((_, Tok::Open, _)) => {
                    let elem = self.element_start(base + stack.len())?;
                    if elem.empty {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(ElemNode { elem, children: Vec::new() });
                        }
                    } else {
                        stack.push(ElemNode { elem, children: Vec::new() });
                    }
                }
                | Some((_, Tok::OpenSlash, _)) => {
                    let name = self.close_name()?;
                    let Some(done) = stack.pop() else {
                        return Err(XmlError::UnexpectedEof);
                    };
                    if done.elem.name != name {
                        return Err(XmlError::MismatchedClose {
                            expected: done.elem.name,
                            found: name,
                        });
                    }
                    match stack.last_mut() {
                        | Some(parent) => parent.children.push(done),
                        | None => return Ok(done),
                    }
                }
                | Some((at, tok, _)) => {
                    return Err(XmlError::Unexpected { found: tok.to_string(), at });
                }
            }
        }
    }

    fn next_tok(&mut self) -> Result<Option<(usize, Tok<'source>, usize)>> {
        match self.toks.next() {
            | None => Ok(None),
            | Some(res) => res.map(Some),
        }
    }

    /// Parse the remainder of an element start, the `Open` token already
    /// consumed.
    fn element_start(&mut self, depth: usize) -> Result<Elem> {
        let name = match self.next_tok()? {
            | Some((_, Tok::Name(n), _)) => n.to_owned(),
            | other => return Err(unexpected(other)),
        };
        let mut attrs = Vec::new();
        loop {
            match self.next_tok()? {
                | Some((_, Tok::Close, _)) => {
                    return Ok(Elem { name, attrs, depth, empty: false });
                }
                | Some((_, Tok::SlashClose, _)) => {
                    return Ok(Elem { name, attrs, depth, empty: true });
                }
                | Some((_, Tok::Name(k), _)) => {
                    let key = k.to_owned();
                    match self.next_tok()? {
                        | Some((_, Tok::Equals, _)) => {}
                        | other => return Err(unexpected(other)),
                    }
                    match self.next_tok()? {
                        | Some((_, Tok::Quoted(v) | Tok::QuotedSingle(v), _)) => {
                            attrs.push((key, unescape(&v[1..v.len() - 1])));
                        }
                        | other => return Err(unexpected(other)),
                    }
                }
                | other => return Err(unexpected(other)),
            }
        }
    }

    /// Parse `Name >` after an `OpenSlash` token.
    fn close_name(&mut self) -> Result<String> {
        let name = match self.next_tok()? {
            | Some((_, Tok::Name(n), _)) => n.to_owned(),
            | other => return Err(unexpected(other)),
        };
        match self.next_tok()? {
            | Some((_, Tok::Close, _)) => Ok(name),
            | other => Err(unexpected(other)),
        }
    }
}

fn unexpected(tok: Option<(usize, Tok<'_>, usize)>) -> XmlError {
    match tok {
        | Some((at, tok, _)) => XmlError::Unexpected { found: tok.to_string(), at },
        | None => XmlError::UnexpectedEof,
    }
}
