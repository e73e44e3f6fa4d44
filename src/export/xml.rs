//! GraphML and GEXF serializers.

use crate::model::Ontology;

/// GraphML document with `label`/`type` node keys and a `label` edge key.
pub fn to_graphml(ontology: &Ontology) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(
        "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"http://graphml.graphdrawing.org/xmlns \
         http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd\">\n",
    );
    xml.push_str("  <key id=\"label\" for=\"node\" attr.name=\"Label\" attr.type=\"string\"/>\n");
    xml.push_str("  <key id=\"type\" for=\"node\" attr.name=\"Type\" attr.type=\"string\"/>\n");
    xml.push_str("  <key id=\"edge_label\" for=\"edge\" attr.name=\"Label\" attr.type=\"string\"/>\n");
    xml.push_str("  <graph id=\"ontology\" edgedefault=\"directed\">\n");

    for node in ontology.nodes() {
        xml.push_str(&format!("    <node id=\"{}\">\n", escape_xml(&node.id)));
        xml.push_str(&format!("      <data key=\"label\">{}</data>\n", escape_xml(&node.label)));
        xml.push_str(&format!("      <data key=\"type\">{}</data>\n", escape_xml(&node.node_type)));
        xml.push_str("    </node>\n");
    }
    for edge in ontology.edges() {
        xml.push_str(&format!(
            "    <edge id=\"{}\" source=\"{}\" target=\"{}\">\n",
            escape_xml(&edge.id),
            escape_xml(&edge.source),
            escape_xml(&edge.target)
        ));
        xml.push_str(&format!("      <data key=\"edge_label\">{}</data>\n", escape_xml(&edge.label)));
        xml.push_str("    </edge>\n");
    }

    xml.push_str("  </graph>\n</graphml>");
    xml
}

/// GEXF 1.2 document with `type`/`label` node attributes and a `label` edge attribute.
pub fn to_gexf(ontology: &Ontology) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<gexf xmlns=\"http://www.gexf.net/1.2draft\" version=\"1.2\">\n");
    xml.push_str(&format!(
        "  <meta lastmodifieddate=\"{}\">\n",
        ontology.created_at().format("%Y-%m-%d")
    ));
    xml.push_str("    <creator>Dotwork Narrative-to-Ontology</creator>\n");
    xml.push_str("    <description>Ontology extracted from narrative</description>\n");
    xml.push_str("  </meta>\n");
    xml.push_str("  <graph mode=\"static\" defaultedgetype=\"directed\">\n");
    xml.push_str("    <attributes class=\"node\">\n");
    xml.push_str("      <attribute id=\"0\" title=\"type\" type=\"string\"/>\n");
    xml.push_str("      <attribute id=\"1\" title=\"label\" type=\"string\"/>\n");
    xml.push_str("    </attributes>\n");
    xml.push_str("    <attributes class=\"edge\">\n");
    xml.push_str("      <attribute id=\"0\" title=\"label\" type=\"string\"/>\n");
    xml.push_str("    </attributes>\n");

    xml.push_str("    <nodes>\n");
    for node in ontology.nodes() {
        let label = escape_xml(&node.label);
        xml.push_str(&format!("      <node id=\"{}\" label=\"{label}\">\n", escape_xml(&node.id)));
        xml.push_str("        <attvalues>\n");
        xml.push_str(&format!(
            "          <attvalue for=\"0\" value=\"{}\"/>\n",
            escape_xml(&node.node_type)
        ));
        xml.push_str(&format!("          <attvalue for=\"1\" value=\"{label}\"/>\n"));
        xml.push_str("        </attvalues>\n      </node>\n");
    }
    xml.push_str("    </nodes>\n");

    xml.push_str("    <edges>\n");
    for edge in ontology.edges() {
        xml.push_str(&format!(
            "      <edge id=\"{}\" source=\"{}\" target=\"{}\">\n",
            escape_xml(&edge.id),
            escape_xml(&edge.source),
            escape_xml(&edge.target)
        ));
        xml.push_str("        <attvalues>\n");
        xml.push_str(&format!(
            "          <attvalue for=\"0\" value=\"{}\"/>\n",
            escape_xml(&edge.label)
        ));
        xml.push_str("        </attvalues>\n      </edge>\n");
    }
    xml.push_str("    </edges>\n");

    xml.push_str("  </graph>\n</gexf>");
    xml
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample;

    #[test]
    fn escapes_all_five_entities() {
        assert_eq!(escape_xml(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&apos;");
    }

    #[test]
    fn graphml_structure() {
        let xml = to_graphml(&sample());
        assert!(xml.starts_with("<?xml"));
        assert_eq!(xml.matches("<node ").count(), 3);
        assert_eq!(xml.matches("<edge ").count(), 2);
        assert!(xml.contains("<data key=\"label\">Sarah &amp; Co</data>"));
        assert!(xml.contains("<data key=\"label\">Q2 &quot;2024&quot;</data>"));
        assert!(xml.ends_with("</graphml>"));
    }

    #[test]
    fn gexf_structure() {
        let xml = to_gexf(&sample());
        assert!(xml.contains("<creator>Dotwork Narrative-to-Ontology</creator>"));
        assert!(xml.contains("<node id=\"e2\" label=\"Sarah &amp; Co\">"));
        assert!(xml.contains("<edge id=\"r1\" source=\"e2\" target=\"e3\">"));
        assert!(xml.contains("<attvalue for=\"0\" value=\"improves\"/>"));
    }
}
