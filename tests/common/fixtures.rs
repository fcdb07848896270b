//! Thread page fixtures

/// Emoticon as served by the Tieba editor (protocol-relative)
pub const EMOTICON_SRC: &str = "//tb2.bdstatic.com/tb/editor/images/client/image_emoticon25.png";

/// One reply container with the markup Tieba uses
pub fn floor(label: &str, author: &str, time: &str, body: &str) -> String {
    format!(
        r#"<div class="l_post l_post_bright j_l_post clearfix">
  <div class="d_author">
    <ul class="p_author">
      <li class="d_name"><a class="p_author_name j_user_card" href="/home/main?un={author}">{author}</a></li>
    </ul>
  </div>
  <div class="d_post_content_main">
    <div class="p_content">
      <cc><div class="d_post_content j_d_post_content clearfix" style="display:;">{body}</div></cc>
    </div>
    <div class="core_reply j_lzl_wrapper">
      <div class="core_reply_tail clearfix">
        <div class="post-tail-wrap">
          <span class="tail-info">来自<a href="/mo/">Android客户端</a></span>
          <span class="tail-info">{label}</span>
          <span class="tail-info">{time}</span>
        </div>
      </div>
    </div>
  </div>
</div>"#
    )
}

/// Advertisement slot that appears between replies
pub fn ad_floor() -> String {
    r#"<div class="l_post l_post_bright">
  <div class="d_post_content">推广内容</div>
  <div class="ad_bottom_view"><span>广告</span></div>
</div>"#
        .to_string()
}

/// Full thread page wrapping `floors`
pub fn page(title: &str, floors: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>{title}</title></head>
<body>
  <div class="left_section">
    <div class="p_postlist" id="j_p_postlist">{}</div>
  </div>
</body>
</html>"#,
        floors.concat()
    )
}
