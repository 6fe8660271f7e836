use super::{ElementRules, NodeData, NodeId, Rules};
use crate::error::GrammarError;
use crate::path::{Path, PathSegment};
use x12_grammar_tables::{
    CompositeDef, ElementDef, FieldDef, GrammarDef, LoopChildDef, LoopDef, Repeat, SegmentDef,
    TABLE_FORMAT_VERSION, Usage,
};

/// Flatten a definition into arena order (depth-first, declaration order).
pub(super) fn build_nodes(def: &GrammarDef) -> Result<Vec<NodeData>, GrammarError> {
    if def.format_version != TABLE_FORMAT_VERSION {
        return Err(GrammarError::definition(
            Path::root(),
            format!(
                "table format version {:?} is not supported (expected {TABLE_FORMAT_VERSION:?})",
                def.format_version
            ),
        ));
    }
    let mut builder = Builder { nodes: Vec::new() };
    let root = builder.push(NodeData {
        id: def.transaction_set.clone(),
        name: def.name.clone(),
        usage: Usage::Required,
        position: 0,
        parent: None,
        children: Vec::new(),
        path: Path::root(),
        rules: Rules::Loop {
            repeat: Repeat {
                min: 1,
                max: Some(1),
            },
            entry: None,
        },
    });
    builder.add_loop_children(root, &def.children)?;
    Ok(builder.nodes)
}

struct Builder {
    nodes: Vec<NodeData>,
}

impl Builder {
    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    fn add_loop_children(
        &mut self,
        parent: NodeId,
        defs: &[LoopChildDef],
    ) -> Result<(), GrammarError> {
        let parent_path = self.nodes[parent.0].path.clone();
        let annotations = sibling_annotations(&parent_path, defs)?;

        let mut children = Vec::with_capacity(defs.len());
        for (position, (def, qualifier)) in defs.iter().zip(annotations).enumerate() {
            let mut step = PathSegment::new(child_id(def));
            if let Some(q) = qualifier {
                step = step.with_qualifier(q);
            }
            let path = parent_path.child(step);
            let id = match def {
                LoopChildDef::Loop(l) => self.add_loop(parent, position, path, l)?,
                LoopChildDef::Segment(s) => self.add_segment(parent, position, path, s)?,
            };
            children.push(id);
        }

        let entry = children
            .first()
            .and_then(|&first| match &self.nodes[first.0].rules {
                Rules::Segment { .. } => Some(first),
                Rules::Loop { entry, .. } => *entry,
                Rules::Composite | Rules::Element(_) => None,
            });
        let parent_data = &mut self.nodes[parent.0];
        parent_data.children = children;
        if let Rules::Loop { entry: slot, .. } = &mut parent_data.rules {
            *slot = entry;
        }
        Ok(())
    }

    fn add_loop(
        &mut self,
        parent: NodeId,
        position: usize,
        path: Path,
        def: &LoopDef,
    ) -> Result<NodeId, GrammarError> {
        check_identifier(&path, &def.id)?;
        check_repeat(&path, def.repeat)?;
        let id = self.push(NodeData {
            id: def.id.clone(),
            name: def.name.clone(),
            usage: def.usage,
            position,
            parent: Some(parent),
            children: Vec::new(),
            path,
            rules: Rules::Loop {
                repeat: def.repeat,
                entry: None,
            },
        });
        self.add_loop_children(id, &def.children)?;
        Ok(id)
    }

    fn add_segment(
        &mut self,
        parent: NodeId,
        position: usize,
        path: Path,
        def: &SegmentDef,
    ) -> Result<NodeId, GrammarError> {
        check_identifier(&path, &def.id)?;
        check_repeat(&path, def.repeat)?;
        if let Some(q) = &def.qualifier
            && (q.position == 0 || q.position > def.fields.len())
        {
            return Err(GrammarError::definition(
                &path,
                format!(
                    "qualifier position {} outside the segment's {} fields",
                    q.position,
                    def.fields.len()
                ),
            ));
        }
        if let Some(q) = &def.qualifier
            && (q.value.is_empty() || q.value.contains(['[', ']', '/']))
        {
            return Err(GrammarError::definition(
                &path,
                format!("qualifier value {:?} is not addressable by path", q.value),
            ));
        }

        let seg = self.push(NodeData {
            id: def.id.clone(),
            name: def.name.clone(),
            usage: def.usage,
            position,
            parent: Some(parent),
            children: Vec::new(),
            path: path.clone(),
            rules: Rules::Segment {
                repeat: def.repeat,
                qualifier: def.qualifier.clone(),
            },
        });

        let mut children = Vec::with_capacity(def.fields.len());
        for (i, field) in def.fields.iter().enumerate() {
            let field_path = path.child(PathSegment::position(i + 1));
            let id = match field {
                FieldDef::Element(e) => self.add_element(seg, i, field_path, e)?,
                FieldDef::Composite(c) => self.add_composite(seg, i, field_path, c)?,
            };
            children.push(id);
        }
        self.nodes[seg.0].children = children;
        Ok(seg)
    }

    fn add_composite(
        &mut self,
        parent: NodeId,
        position: usize,
        path: Path,
        def: &CompositeDef,
    ) -> Result<NodeId, GrammarError> {
        let comp = self.push(NodeData {
            id: def.id.clone(),
            name: def.name.clone(),
            usage: def.usage,
            position,
            parent: Some(parent),
            children: Vec::new(),
            path: path.clone(),
            rules: Rules::Composite,
        });
        let mut children = Vec::with_capacity(def.elements.len());
        for (j, e) in def.elements.iter().enumerate() {
            children.push(self.add_element(comp, j, path.with_sub_index(j + 1), e)?);
        }
        self.nodes[comp.0].children = children;
        Ok(comp)
    }

    fn add_element(
        &mut self,
        parent: NodeId,
        position: usize,
        path: Path,
        def: &ElementDef,
    ) -> Result<NodeId, GrammarError> {
        if def.min_len > def.max_len {
            return Err(GrammarError::definition(
                &path,
                format!(
                    "element {} has min_len {} greater than max_len {}",
                    def.id, def.min_len, def.max_len
                ),
            ));
        }
        Ok(self.push(NodeData {
            id: def.id.clone(),
            name: def.name.clone(),
            usage: def.usage,
            position,
            parent: Some(parent),
            children: Vec::new(),
            path,
            rules: Rules::Element(ElementRules {
                data_ele: def.data_ele.clone(),
                data_type: def.data_type,
                min_len: def.min_len,
                max_len: def.max_len,
                valid_codes: def.valid_codes.clone(),
                external_codes: def.external_codes.clone(),
            }),
        }))
    }
}

fn child_id(def: &LoopChildDef) -> &str {
    match def {
        LoopChildDef::Loop(l) => &l.id,
        LoopChildDef::Segment(s) => &s.id,
    }
}

/// Qualifier of a segment, or of the segment that opens a loop.
fn child_qualifier(def: &LoopChildDef) -> Option<&str> {
    match def {
        LoopChildDef::Segment(s) => s.qualifier.as_ref().map(|q| q.value.as_str()),
        LoopChildDef::Loop(l) => l.children.first().and_then(child_qualifier),
    }
}

/// The qualifier to show in each sibling's path step.
///
/// Only siblings that share an identifier are annotated; each of them must
/// carry a qualifier distinct from the others.
fn sibling_annotations<'d>(
    parent_path: &Path,
    defs: &'d [LoopChildDef],
) -> Result<Vec<Option<&'d str>>, GrammarError> {
    let mut out = vec![None; defs.len()];
    for (i, def) in defs.iter().enumerate() {
        let id = child_id(def);
        let same_id: Vec<usize> = defs
            .iter()
            .enumerate()
            .filter(|(_, other)| child_id(other) == id)
            .map(|(j, _)| j)
            .collect();
        if same_id.len() < 2 {
            continue;
        }
        let Some(qualifier) = child_qualifier(def) else {
            return Err(GrammarError::definition(
                parent_path.child(PathSegment::new(id)),
                "repeated identifier must declare a qualifier",
            ));
        };
        if same_id
            .iter()
            .any(|&j| j != i && child_qualifier(&defs[j]) == Some(qualifier))
        {
            return Err(GrammarError::definition(
                parent_path.child(PathSegment::new(id).with_qualifier(qualifier)),
                "qualifier shared by more than one sibling",
            ));
        }
        out[i] = Some(qualifier);
    }
    Ok(out)
}

fn check_identifier(path: &Path, id: &str) -> Result<(), GrammarError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GrammarError::definition(
            path,
            format!("identifier {id:?} is not addressable by path"),
        ));
    }
    Ok(())
}

fn check_repeat(path: &Path, repeat: Repeat) -> Result<(), GrammarError> {
    if let Some(max) = repeat.max
        && repeat.min > max
    {
        return Err(GrammarError::definition(
            path,
            format!("repeat min {} exceeds max {max}", repeat.min),
        ));
    }
    Ok(())
}
